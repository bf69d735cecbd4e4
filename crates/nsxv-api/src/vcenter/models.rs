use serde::{Deserialize, Serialize};

/// `GET /api/vcenter/datacenter` item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatacenterSummary {
    pub datacenter: String,
    pub name: String,
}

/// Folder type as reported by vCenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FolderType {
    Datacenter,
    Datastore,
    Host,
    Network,
    VirtualMachine,
}

impl FolderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Datacenter => "DATACENTER",
            Self::Datastore => "DATASTORE",
            Self::Host => "HOST",
            Self::Network => "NETWORK",
            Self::VirtualMachine => "VIRTUAL_MACHINE",
        }
    }

    /// The type of a datacenter's top-level folder, by its fixed name.
    pub fn of_root_folder(name: &str) -> Option<Self> {
        match name {
            "host" => Some(Self::Host),
            "vm" => Some(Self::VirtualMachine),
            "network" => Some(Self::Network),
            "datastore" => Some(Self::Datastore),
            _ => None,
        }
    }
}

/// `GET /api/vcenter/folder` item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FolderSummary {
    pub folder: String,
    pub name: String,
    #[serde(rename = "type")]
    pub folder_type: FolderType,
}

/// `GET /api/vcenter/cluster` item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClusterSummary {
    pub cluster: String,
    pub name: String,
    #[serde(default)]
    pub ha_enabled: Option<bool>,
    #[serde(default)]
    pub drs_enabled: Option<bool>,
}

/// `GET /api/vcenter/host` item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostSummary {
    pub host: String,
    pub name: String,
    #[serde(default)]
    pub connection_state: Option<String>,
    #[serde(default)]
    pub power_state: Option<String>,
}
