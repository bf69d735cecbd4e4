//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod cluster;
pub mod host;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an NSX-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Cluster(args) => cluster::handle(args, global).await,
        Command::Host(args) => host::handle(args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
