// vCenter REST API client modules
//
// Session-authenticated client for the vSphere Automation API (`/api`),
// used to resolve inventory paths and names to managed object ids.

pub mod client;
pub mod inventory;
pub mod models;

pub use client::VcenterClient;
pub use inventory::InventoryFilter;
pub use models::{ClusterSummary, DatacenterSummary, FolderSummary, FolderType, HostSummary};
