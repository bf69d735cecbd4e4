// nsxv-api: Async Rust client for the NSX-V Manager and vCenter REST APIs

pub mod error;
pub mod nsx;
pub mod schema;
pub mod transport;
pub mod vcenter;

pub use error::Error;
pub use nsx::NsxClient;
pub use schema::{ApiSchema, Method};
pub use transport::{TlsMode, TransportConfig};
pub use vcenter::VcenterClient;
