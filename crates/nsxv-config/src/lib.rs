//! INI configuration for the nsxv CLI.
//!
//! One INI file per invocation, layered with `NSXV_` environment overrides
//! through figment, and translated into `nsxv_core` connection settings.
//!
//! ```ini
//! [nsxv]
//! nsx_manager = nsxmanager.corp.local
//! nsx_username = admin
//! nsx_password = secret
//!
//! [vcenter]
//! vcenter = vcenter.corp.local
//! vcenter_user = administrator@vsphere.local
//! vcenter_passwd = secret
//!
//! [nsxraml]
//! nsxraml_file = /opt/nsxraml/nsxvapi.raml
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use nsxv_core::{NsxConfig, PollConfig, SchemaSource, TlsVerification, VcenterConfig};

mod scalar;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("config file has no [{0}] section")]
    MissingSection(&'static str),

    #[error("[{section}] is missing '{key}'")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── INI sections ────────────────────────────────────────────────────
//
// Every value is kept as text here: INI has no types, and environment
// overrides arrive pre-parsed as numbers or booleans. Typing happens when
// sections are translated below.

/// The whole configuration file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    pub nsxv: Option<NsxSection>,
    pub vcenter: Option<VcenterSection>,
    pub nsxraml: Option<RamlSection>,
    pub jobs: Option<JobsSection>,
}

/// `[nsxv]`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NsxSection {
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub nsx_manager: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub nsx_username: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub nsx_password: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub verify_tls: Option<String>,
    pub ca_cert: Option<PathBuf>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub timeout: Option<String>,
}

/// `[vcenter]`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VcenterSection {
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub vcenter: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub vcenter_user: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub vcenter_passwd: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub verify_tls: Option<String>,
    pub ca_cert: Option<PathBuf>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub timeout: Option<String>,
}

/// `[nsxraml]`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RamlSection {
    pub nsxraml_file: Option<PathBuf>,
}

/// `[jobs]`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JobsSection {
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub poll_interval: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_string")]
    pub max_attempts: Option<String>,
}

// ── Loading ─────────────────────────────────────────────────────────

type IniMap = BTreeMap<String, BTreeMap<String, String>>;

/// Load the configuration from an INI file plus `NSXV_` environment
/// overrides (`NSXV_NSXV__NSX_PASSWORD`, `NSXV_JOBS__POLL_INTERVAL`, ...).
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    let map = parse_ini(&text).map_err(|reason| ConfigError::Unreadable {
        path: path.to_owned(),
        reason,
    })?;
    debug!(path = %path.display(), sections = map.len(), "loaded config file");

    let config = Figment::new()
        .merge(Serialized::defaults(map))
        .merge(Env::prefixed("NSXV_").split("__").ignore(&["ini"]))
        .extract()?;
    Ok(config)
}

/// INI text to section → key → value. Keys are case-insensitive, so they
/// are folded to lowercase; section names are kept as written.
fn parse_ini(text: &str) -> Result<IniMap, String> {
    let ini = ini::Ini::load_from_str(text).map_err(|e| e.to_string())?;
    let mut map = IniMap::new();
    for (section, props) in &ini {
        let Some(section) = section else { continue };
        let entries = map.entry(section.to_owned()).or_default();
        for (key, value) in props.iter() {
            entries.insert(key.to_ascii_lowercase(), value.to_owned());
        }
    }
    Ok(map)
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    /// NSX Manager connection settings from `[nsxv]` and `[nsxraml]`.
    pub fn nsx(&self) -> Result<NsxConfig, ConfigError> {
        let section = self.nsxv.as_ref().ok_or(ConfigError::MissingSection("nsxv"))?;
        let manager = required(section.nsx_manager.as_ref(), "nsxv", "nsx_manager")?;
        let username = required(section.nsx_username.as_ref(), "nsxv", "nsx_username")?;
        let password = required(section.nsx_password.as_ref(), "nsxv", "nsx_password")?;

        let schema = match self.nsxraml.as_ref().and_then(|r| r.nsxraml_file.clone()) {
            Some(path) => SchemaSource::File(path),
            None => SchemaSource::Bundled,
        };

        Ok(NsxConfig {
            url: server_url("nsx_manager", manager)?,
            username: username.clone(),
            password: SecretString::from(password.clone()),
            schema,
            tls: tls(
                "verify_tls",
                section.verify_tls.as_deref(),
                section.ca_cert.as_ref(),
            )?,
            timeout: Duration::from_secs(
                section
                    .timeout
                    .as_deref()
                    .map(|t| parse_number("timeout", t))
                    .transpose()?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }

    /// vCenter connection settings from `[vcenter]`.
    pub fn vcenter(&self) -> Result<VcenterConfig, ConfigError> {
        let section = self
            .vcenter
            .as_ref()
            .ok_or(ConfigError::MissingSection("vcenter"))?;
        let server = required(section.vcenter.as_ref(), "vcenter", "vcenter")?;
        let username = required(section.vcenter_user.as_ref(), "vcenter", "vcenter_user")?;
        let password = required(section.vcenter_passwd.as_ref(), "vcenter", "vcenter_passwd")?;

        Ok(VcenterConfig {
            url: server_url("vcenter", server)?,
            username: username.clone(),
            password: SecretString::from(password.clone()),
            tls: tls(
                "verify_tls",
                section.verify_tls.as_deref(),
                section.ca_cert.as_ref(),
            )?,
            timeout: Duration::from_secs(
                section
                    .timeout
                    .as_deref()
                    .map(|t| parse_number("timeout", t))
                    .transpose()?
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }

    /// Job polling cadence from `[jobs]`, defaulting to 30 s × 20.
    pub fn polling(&self) -> Result<PollConfig, ConfigError> {
        let mut poll = PollConfig::default();
        let Some(jobs) = &self.jobs else {
            return Ok(poll);
        };
        if let Some(secs) = jobs.poll_interval.as_deref() {
            poll.interval = Duration::from_secs(parse_number("poll_interval", secs)?);
        }
        if let Some(n) = jobs.max_attempts.as_deref() {
            let n = parse_number("max_attempts", n)?;
            poll.max_attempts = u32::try_from(n)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Validation {
                    field: "max_attempts".into(),
                    reason: format!("expected a positive count, got {n}"),
                })?;
        }
        Ok(poll)
    }
}

fn required<'a>(
    value: Option<&'a String>,
    section: &'static str,
    key: &'static str,
) -> Result<&'a String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingKey { section, key })
}

fn server_url(field: &str, server: &str) -> Result<Url, ConfigError> {
    nsxv_core::server_url(server).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{server}' is not a usable address: {e}"),
    })
}

fn tls(
    field: &str,
    verify: Option<&str>,
    ca_cert: Option<&PathBuf>,
) -> Result<TlsVerification, ConfigError> {
    if let Some(path) = ca_cert {
        return Ok(TlsVerification::CustomCa(path.clone()));
    }
    match verify.map(|v| parse_bool(field, v)).transpose()? {
        Some(true) => Ok(TlsVerification::SystemDefaults),
        // Managers and vCenters ship self-signed certificates.
        Some(false) | None => Ok(TlsVerification::DangerAcceptInvalid),
    }
}

/// INI booleans: `1/yes/true/on` and `0/no/false/off`, case-insensitive.
fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_number(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected a whole number, got '{value}'"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const FULL: &str = "\
[nsxv]
nsx_manager = nsxmanager.corp.local
nsx_username = admin
nsx_password = VMware1!

[vcenter]
vcenter = https://vcenter.corp.local:8443
vcenter_user = administrator@vsphere.local
vcenter_passwd = VMware1!
verify_tls = yes

[nsxraml]
nsxraml_file = /opt/nsxraml/nsxvapi.raml

[jobs]
poll_interval = 5
max_attempts = 3
";

    /// Load `text` inside a figment jail. Jails are serialized, so the
    /// environment overrides set by one test never leak into another.
    fn with_file(text: &str, check: impl FnOnce(Config)) {
        Jail::expect_with(|jail| {
            jail.create_file("nsx.ini", text)?;
            check(load(Path::new("nsx.ini")).unwrap());
            Ok(())
        });
    }

    #[test]
    fn full_file_translates() {
        with_file(FULL, |config| {
            let nsx = config.nsx().unwrap();
            assert_eq!(nsx.url.as_str(), "https://nsxmanager.corp.local/");
            assert_eq!(nsx.username, "admin");
            assert_eq!(nsx.password.expose_secret(), "VMware1!");
            assert_eq!(
                nsx.schema,
                SchemaSource::File("/opt/nsxraml/nsxvapi.raml".into())
            );
            assert_eq!(nsx.tls, TlsVerification::DangerAcceptInvalid);
            assert_eq!(nsx.timeout, Duration::from_secs(30));

            let vc = config.vcenter().unwrap();
            assert_eq!(vc.url.as_str(), "https://vcenter.corp.local:8443/");
            assert_eq!(vc.tls, TlsVerification::SystemDefaults);

            let poll = config.polling().unwrap();
            assert_eq!(poll.interval, Duration::from_secs(5));
            assert_eq!(poll.max_attempts, 3);
        });
    }

    #[test]
    fn minimal_file_uses_defaults() {
        with_file(
            "[nsxv]\nnsx_manager = 10.0.0.5\nnsx_username = admin\nnsx_password = default\n",
            |config| {
                assert_eq!(config.nsx().unwrap().schema, SchemaSource::Bundled);
                assert_eq!(config.polling().unwrap(), PollConfig::default());
                assert!(matches!(
                    config.vcenter(),
                    Err(ConfigError::MissingSection("vcenter"))
                ));
            },
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        with_file(
            "[nsxv]\nNSX_Manager = nsx\nnsx_username = admin\nNSX_PASSWORD = pw\n",
            |config| {
                assert_eq!(config.nsx().unwrap().url.host_str(), Some("nsx"));
            },
        );
    }

    #[test]
    fn missing_key_is_named() {
        with_file("[nsxv]\nnsx_manager = nsx\nnsx_username = admin\n", |config| {
            let err = config.nsx().unwrap_err();
            assert_eq!(err.to_string(), "[nsxv] is missing 'nsx_password'");
        });
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/nonexistent/nsx.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert!(err.to_string().contains("/nonexistent/nsx.ini"), "{err}");
    }

    #[test]
    fn bad_boolean_is_rejected() {
        with_file(
            "[nsxv]\nnsx_manager = nsx\nnsx_username = a\nnsx_password = b\nverify_tls = maybe\n",
            |config| {
                assert!(matches!(config.nsx(), Err(ConfigError::Validation { .. })));
            },
        );
    }

    #[test]
    fn zero_attempts_is_rejected() {
        with_file("[jobs]\nmax_attempts = 0\n", |config| {
            assert!(config.polling().is_err());
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "nsx.ini",
                "[nsxv]\nnsx_manager = nsx\nnsx_username = admin\nnsx_password = from-file\n",
            )?;
            jail.set_env("NSXV_NSXV__NSX_PASSWORD", "from-env");
            jail.set_env("NSXV_JOBS__MAX_ATTEMPTS", "7");

            let config = load(Path::new("nsx.ini")).unwrap();
            assert_eq!(config.nsx().unwrap().password.expose_secret(), "from-env");
            assert_eq!(config.polling().unwrap().max_attempts, 7);
            Ok(())
        });
    }
}
