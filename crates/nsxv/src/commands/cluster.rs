//! Cluster command handlers.

use tabled::Tabled;
use tracing::debug;

use nsxv_core::{
    ClusterCommand, InventoryKind, NwFabricFeatureStatus, TargetSelector, connect_nsx, fabric,
    parse_command,
};

use crate::cli::{ClusterArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "featureId")]
    feature_id: String,
    #[tabled(rename = "featureVersion")]
    feature_version: String,
    #[tabled(rename = "updateAvailable")]
    update_available: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "installed")]
    installed: String,
    #[tabled(rename = "enabled")]
    enabled: String,
    #[tabled(rename = "allowConfiguration")]
    allow_configuration: String,
    #[tabled(rename = "message")]
    message: String,
}

fn flag(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn feature_row(f: &NwFabricFeatureStatus, color: bool) -> FeatureRow {
    FeatureRow {
        feature_id: f.feature_id.clone(),
        feature_version: f.feature_version.clone().unwrap_or_default(),
        update_available: flag(f.update_available),
        status: f
            .status
            .as_deref()
            .map(|s| output::paint_status(s, color))
            .unwrap_or_default(),
        installed: flag(f.installed),
        enabled: flag(f.enabled),
        allow_configuration: flag(f.allow_configuration),
        message: f.message.clone().unwrap_or_default(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ClusterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Validate the operation before touching config or the network.
    let command = parse_command::<ClusterCommand>(&args.command)?;
    let selector = TargetSelector::from_flags(
        args.target.moid,
        args.target.inventory_path,
        args.target.name,
    )?;

    let config = util::load_config(global)?;
    let nsx = connect_nsx(&config.nsx()?)?;
    let moid = util::resolve_target(&selector, InventoryKind::Cluster, &config).await?;
    debug!(%command, %moid, "running cluster command");

    match command {
        ClusterCommand::ShowNwfabricStatus => {
            let features = fabric::show_nwfabric_status(&nsx, &moid)
                .await
                .map_err(|e| CliError::during(e, command, &moid))?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &features,
                |f| feature_row(f, color),
                |f| format!("{}\t{}", f.feature_id, f.status.as_deref().unwrap_or("")),
            )?;
            output::print_output(&out, global.quiet);
        }
        ClusterCommand::InstallNetworkVirtualization => {
            let poll = util::poll_config(&config, global)?;
            let observer = util::ProgressObserver::new(global.quiet);
            fabric::install_network_virtualization(&nsx, &moid, poll, &observer)
                .await
                .map_err(|e| CliError::during(e, command, &moid))?;
        }
        ClusterCommand::UninstallNetworkVirtualization => {
            let poll = util::poll_config(&config, global)?;
            let observer = util::ProgressObserver::new(global.quiet);
            fabric::uninstall_network_virtualization(&nsx, &moid, poll, &observer)
                .await
                .map_err(|e| CliError::during(e, command, &moid))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_row_fills_missing_values_with_blanks() {
        let feature = NwFabricFeatureStatus {
            feature_id: "com.vmware.vshield.vsm.vxlan".into(),
            status: Some("UNKNOWN".into()),
            installed: Some(false),
            ..NwFabricFeatureStatus::default()
        };
        let row = feature_row(&feature, false);
        assert_eq!(row.feature_id, "com.vmware.vshield.vsm.vxlan");
        assert_eq!(row.status, "UNKNOWN");
        assert_eq!(row.installed, "false");
        assert_eq!(row.feature_version, "");
        assert_eq!(row.update_available, "");
    }
}
