// ── Runtime connection configuration ──
//
// These types describe *how* to reach NSX Manager and vCenter. They carry
// credentials and connection tuning, but never touch disk. The CLI builds
// them from the INI file and hands them in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use nsxv_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. NSX Manager and vCenter ship self-signed certs.
    #[default]
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Where the NSX API description comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaSource {
    /// The RAML document compiled into the binary.
    #[default]
    Bundled,
    /// A RAML file on disk (`nsxraml_file`).
    File(PathBuf),
}

/// Connection settings for NSX Manager.
#[derive(Debug, Clone)]
pub struct NsxConfig {
    /// Manager URL (e.g., `https://nsxmanager.corp.local`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub schema: SchemaSource,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl NsxConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: (&self.tls).into(),
            timeout: self.timeout,
        }
    }
}

/// Connection settings for vCenter. Only needed for path and name lookups.
#[derive(Debug, Clone)]
pub struct VcenterConfig {
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl VcenterConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: (&self.tls).into(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_verification_maps_to_transport_mode() {
        assert_eq!(TlsMode::from(&TlsVerification::SystemDefaults), TlsMode::System);
        assert_eq!(
            TlsMode::from(&TlsVerification::CustomCa("/etc/ca.pem".into())),
            TlsMode::CustomCa("/etc/ca.pem".into())
        );
        assert_eq!(
            TlsMode::from(&TlsVerification::default()),
            TlsMode::DangerAcceptInvalid
        );
    }
}
