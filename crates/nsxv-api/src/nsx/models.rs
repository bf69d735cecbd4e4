// NSX Manager wire types
//
// XML response bodies, deserialized with quick-xml. The root element of
// each document maps to the outer struct; repeated child elements map to
// `Vec` fields.

use serde::{Deserialize, Serialize};

/// Feature id of the host preparation (VIB install) feature.
pub const HOST_PREP_FEATURE: &str = "com.vmware.vshield.vsm.nwfabric.hostPrep";

// ── nwfabric/status ─────────────────────────────────────────────────

/// `<resourceStatuses>` root.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatuses {
    #[serde(default)]
    pub resource_status: Vec<ResourceStatus>,
}

/// Fabric status for one resource (cluster, host or datacenter).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    #[serde(default)]
    pub resource: Option<ResourceRef>,
    #[serde(default)]
    pub nw_fabric_feature_status: Vec<NwFabricFeatureStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub object_id: String,
    #[serde(default)]
    pub object_type_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One row of the fabric status table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NwFabricFeatureStatus {
    pub feature_id: String,
    #[serde(default)]
    pub feature_version: Option<String>,
    #[serde(default)]
    pub update_available: Option<bool>,
    /// GREEN / YELLOW / RED / UNKNOWN
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub installed: Option<bool>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub allow_configuration: Option<bool>,
}

// ── vdn/inventory/host/{hostId}/connection/status ───────────────────

/// `<hostConnStatus>` root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConnStatus {
    pub host_id: String,
    #[serde(default)]
    pub nsx_mgr_to_firewall_agent_conn: Option<String>,
    #[serde(default)]
    pub nsx_mgr_to_control_plane_agent_conn: Option<String>,
    #[serde(default)]
    pub host_to_controller_connection_errors: ControllerConnectionErrors,
    #[serde(default)]
    pub full_sync_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConnectionErrors {
    #[serde(default)]
    pub host_to_controller_connection_error: Vec<ControllerConnectionError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConnectionError {
    #[serde(default)]
    pub controller_ip: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

// ── services/taskservice/job/{jobId} ────────────────────────────────

/// `<jobInstances>` root.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInstances {
    #[serde(default)]
    pub job_instance: Vec<JobInstance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInstance {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    /// QUEUED / RUNNING / COMPLETED / FAILED / ...
    pub status: String,
}

// ── Errors ──────────────────────────────────────────────────────────

/// `<error>` body returned alongside 4xx/5xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}
