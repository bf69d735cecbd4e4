//! Host command handlers.

use tabled::Tabled;
use tracing::debug;

use nsxv_core::{
    HostCommand, HostConnStatus, InventoryKind, TargetSelector, connect_nsx, fabric, parse_command,
};

use crate::cli::{GlobalOpts, HostArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ConnStatusRow {
    #[tabled(rename = "hostId")]
    host_id: String,
    #[tabled(rename = "nsxMgrToFirewallAgentConn")]
    firewall_agent: String,
    #[tabled(rename = "nsxMgrToControlPlaneAgentConn")]
    control_plane_agent: String,
    #[tabled(rename = "hostToControllerConnectionErrors")]
    controller_errors: String,
    #[tabled(rename = "fullSyncCount")]
    full_sync_count: String,
}

/// `controllerIp:errorCode` pairs, comma separated.
fn controller_errors(status: &HostConnStatus) -> String {
    status
        .host_to_controller_connection_errors
        .host_to_controller_connection_error
        .iter()
        .map(|e| {
            format!(
                "{}:{}",
                e.controller_ip.as_deref().unwrap_or("?"),
                e.error_code.as_deref().unwrap_or("?")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn conn_row(s: &HostConnStatus, color: bool) -> ConnStatusRow {
    let paint = |v: Option<&str>| {
        v.map(|v| output::paint_status(v, color))
            .unwrap_or_default()
    };
    ConnStatusRow {
        host_id: s.host_id.clone(),
        firewall_agent: paint(s.nsx_mgr_to_firewall_agent_conn.as_deref()),
        control_plane_agent: paint(s.nsx_mgr_to_control_plane_agent_conn.as_deref()),
        controller_errors: controller_errors(s),
        full_sync_count: s.full_sync_count.map(|n| n.to_string()).unwrap_or_default(),
    }
}

pub async fn handle(args: HostArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let command = parse_command::<HostCommand>(&args.command)?;
    let selector = TargetSelector::from_flags(
        args.target.moid,
        args.target.inventory_path,
        args.target.name,
    )?;

    let config = util::load_config(global)?;
    let nsx = connect_nsx(&config.nsx()?)?;
    let moid = util::resolve_target(&selector, InventoryKind::Host, &config).await?;
    debug!(%command, %moid, "running host command");

    match command {
        HostCommand::CommunicationStatus => {
            let status = fabric::communication_status(&nsx, &moid)
                .await
                .map_err(|e| CliError::during(e, command, &moid))?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                std::slice::from_ref(&status),
                |s| conn_row(s, color),
                |s| {
                    format!(
                        "{}\t{}\t{}",
                        s.host_id,
                        s.nsx_mgr_to_firewall_agent_conn.as_deref().unwrap_or(""),
                        s.nsx_mgr_to_control_plane_agent_conn.as_deref().unwrap_or("")
                    )
                },
            )?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsxv_core::ControllerConnectionError;

    #[test]
    fn controller_errors_are_joined() {
        let mut status = HostConnStatus {
            host_id: "host-12".into(),
            full_sync_count: Some(-1),
            ..HostConnStatus::default()
        };
        status
            .host_to_controller_connection_errors
            .host_to_controller_connection_error = vec![
            ControllerConnectionError {
                controller_ip: Some("10.0.0.11".into()),
                error_code: Some("1255604".into()),
            },
            ControllerConnectionError {
                controller_ip: Some("10.0.0.12".into()),
                error_code: None,
            },
        ];

        let row = conn_row(&status, false);
        assert_eq!(row.controller_errors, "10.0.0.11:1255604, 10.0.0.12:?");
        assert_eq!(row.full_sync_count, "-1");
        assert_eq!(row.firewall_agent, "");
    }
}
