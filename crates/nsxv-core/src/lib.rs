//! NSX-V operations composed from the NSX Manager and vCenter clients.
//!
//! - **Fabric** ([`fabric`]): cluster preparation with an idempotency check
//!   up front, plus the read-only fabric and host status queries.
//! - **Jobs** ([`job`]): bounded polling of task framework jobs.
//! - **Inventory** ([`inventory`]): inventory path and name resolution to
//!   managed object ids ([`Moid`]) over vCenter.
//! - **Commands** ([`command`]): the closed command vocabulary and target
//!   selectors the CLI dispatches on.

pub mod command;
pub mod config;
pub mod error;
pub mod fabric;
pub mod inventory;
pub mod job;
pub mod moid;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{ClusterCommand, HostCommand, TargetSelector, parse_command};
pub use config::{NsxConfig, SchemaSource, TlsVerification, VcenterConfig};
pub use error::CoreError;
pub use fabric::{FabricApi, FabricObserver, FabricOperation, Transition};
pub use inventory::{Inventory, InventoryKind, InventoryNode, InventoryResolver, VcenterInventory};
pub use job::{JOB_COMPLETED, JobStatusSource, PollConfig, wait_for_job_completion};
pub use moid::Moid;
pub use session::connect_nsx;

// Wire types surfaced to consumers unchanged.
pub use nsxv_api::NsxClient;
pub use nsxv_api::transport::server_url;
pub use nsxv_api::nsx::models::HOST_PREP_FEATURE;
pub use nsxv_api::nsx::{ControllerConnectionError, HostConnStatus, NwFabricFeatureStatus};
