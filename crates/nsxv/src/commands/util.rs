//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use nsxv_config::Config;
use nsxv_core::{
    FabricObserver, FabricOperation, InventoryKind, Moid, PollConfig, TargetSelector,
    VcenterInventory,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Load the INI file named by `--ini` / `NSXV_INI`.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = global.ini.as_deref().ok_or(CliError::NoIni)?;
    Ok(nsxv_config::load(path)?)
}

/// Job polling cadence: `[jobs]` from the INI file, then CLI overrides.
pub fn poll_config(config: &Config, global: &GlobalOpts) -> Result<PollConfig, CliError> {
    let mut poll = config.polling()?;
    if let Some(secs) = global.poll_interval {
        poll.interval = Duration::from_secs(secs);
    }
    if let Some(n) = global.max_polls {
        poll.max_attempts = n;
    }
    Ok(poll)
}

/// Resolve a target selector to a moid of `kind`.
///
/// vCenter is only contacted for inventory paths and names; its session is
/// logged out whether or not resolution succeeded.
pub async fn resolve_target(
    selector: &TargetSelector,
    kind: InventoryKind,
    config: &Config,
) -> Result<Moid, CliError> {
    if let Some(moid) = selector.literal_moid() {
        return Ok(moid.clone());
    }

    let vcenter = config.vcenter()?;
    let inventory = VcenterInventory::connect(&vcenter).await?;
    let resolved = selector.resolve(kind, &inventory).await;
    if let Err(e) = inventory.close().await {
        warn!(error = %e, "vCenter logout failed");
    }

    let moid = resolved?;
    debug!(%kind, %moid, "target resolved");
    Ok(moid)
}

// ── Progress reporting ───────────────────────────────────────────────

/// Prints fabric operation progress and spins while the job is polled.
pub struct ProgressObserver {
    spinner: ProgressBar,
    quiet: bool,
}

impl ProgressObserver {
    pub fn new(quiet: bool) -> Self {
        let spinner = if quiet || !io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb
        };
        Self { spinner, quiet }
    }
}

impl FabricObserver for ProgressObserver {
    fn already_in_state(&self, operation: FabricOperation, moid: &Moid) {
        output::print_output(
            &format!("{moid} is already {}.", operation.target_state()),
            self.quiet,
        );
    }

    fn submitted(&self, operation: FabricOperation, moid: &Moid, job_id: &str) {
        output::print_output(&format!("{} {moid}.", operation.verb()), self.quiet);
        self.spinner.set_message(format!("waiting for job {job_id}"));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn completed(&self, operation: FabricOperation, moid: &Moid) {
        self.spinner.finish_and_clear();
        output::print_output(
            &format!("cluster {moid} is {}.", operation.target_state()),
            self.quiet,
        );
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        // A failed or timed-out job never reaches `completed`.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
