// NSX Manager API client modules
//
// Schema-driven client for the NSX-V Manager. Generic read/create/delete
// calls are addressed by RAML display name; typed endpoint helpers live
// in `endpoints` as inherent methods on `NsxClient`.

pub mod client;
pub mod endpoints;
pub mod models;
pub mod template;

pub use client::{NsxClient, ObjectResponse};
pub use models::{
    ControllerConnectionError, HostConnStatus, JobInstance, NwFabricFeatureStatus, ResourceStatus,
};
