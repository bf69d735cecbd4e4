//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text, and each error into a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use nsxv_config::ConfigError;
use nsxv_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REMOTE_API: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(nsxv::connection_failed),
        help(
            "{reason}\n\
             Check nsx_manager / vcenter in the INI file and that the server is reachable."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(nsxv::timeout),
        help("Raise `timeout` in the [nsxv] or [vcenter] section.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(nsxv::auth_failed),
        help("Verify nsx_username/nsx_password or vcenter_user/vcenter_passwd in the INI file.")
    )]
    AuthFailed { message: String },

    // ── Target resolution ────────────────────────────────────────────
    #[error("{kind} '{identifier}' not found")]
    #[diagnostic(code(nsxv::not_found))]
    NotFound { kind: String, identifier: String },

    #[error("Inventory path '{path}' has no '{segment}'")]
    #[diagnostic(
        code(nsxv::path_not_found),
        help("Inventory paths start at the datacenter, e.g. dc1/host/cluster1.")
    )]
    PathNotFound { path: String, segment: String },

    #[error("{kind} name '{identifier}' is ambiguous")]
    #[diagnostic(
        code(nsxv::ambiguous),
        help("Matching moids: {candidates}\nSelect one with --{kind}-moid or --{kind}-inventory-path.")
    )]
    Ambiguous {
        kind: String,
        identifier: String,
        candidates: String,
    },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("Unknown command '{name}'")]
    #[diagnostic(code(nsxv::unknown_command), help("Valid commands: {valid}"))]
    UnknownCommand { name: String, valid: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nsxv::validation))]
    Validation { field: String, reason: String },

    #[error("No configuration file given")]
    #[diagnostic(
        code(nsxv::no_ini),
        help("Pass --ini <FILE> or set NSXV_INI.")
    )]
    NoIni,

    // ── Remote operations ────────────────────────────────────────────
    #[error("{command} on {target} failed: {message}")]
    #[diagnostic(code(nsxv::api_error))]
    RemoteApi {
        command: String,
        target: String,
        message: String,
    },

    #[error("Job {job_id} did not complete after {attempts} polls")]
    #[diagnostic(
        code(nsxv::job_timeout),
        help(
            "Last status: {last_status}. The job may still finish on NSX Manager;\n\
             re-run the command later, or raise --max-polls / --poll-interval."
        )
    )]
    JobTimeout {
        job_id: String,
        attempts: u32,
        last_status: String,
    },

    #[error("Job {job_id} ended with status {status}")]
    #[diagnostic(
        code(nsxv::job_failed),
        help("Check the task in the NSX Manager UI for details.")
    )]
    JobFailed { job_id: String, status: String },

    #[error("Unexpected response from NSX Manager: {message}")]
    #[diagnostic(code(nsxv::unexpected_response))]
    UnexpectedResponse { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(nsxv::config))]
    Config(#[from] ConfigError),

    #[error("API schema error: {message}")]
    #[diagnostic(
        code(nsxv::schema),
        help("Check nsxraml_file in the [nsxraml] section, or remove it to use the bundled schema.")
    )]
    Schema { message: String },

    #[error("{0}")]
    #[diagnostic(code(nsxv::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } | Self::JobTimeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::PathNotFound { .. } | Self::Ambiguous { .. } => {
                exit_code::NOT_FOUND
            }
            Self::UnknownCommand { .. } | Self::Validation { .. } | Self::NoIni => {
                exit_code::USAGE
            }
            Self::RemoteApi { .. } | Self::JobFailed { .. } | Self::UnexpectedResponse { .. } => {
                exit_code::REMOTE_API
            }
            Self::Config(_) | Self::Schema { .. } => exit_code::CONFIG,
            Self::Internal(_) => exit_code::GENERAL,
        }
    }

    /// Convert a core error raised while running `command` against `target`,
    /// keeping both in the message of remote failures.
    pub fn during(err: CoreError, command: impl std::fmt::Display, target: impl std::fmt::Display) -> Self {
        match err {
            CoreError::RemoteApi { message, .. } => Self::RemoteApi {
                command: command.to_string(),
                target: target.to_string(),
                message,
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { url } => Self::Timeout { url },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotFound { kind, identifier } => Self::NotFound { kind, identifier },
            CoreError::PathSegmentNotFound { path, segment } => Self::PathNotFound { path, segment },
            CoreError::Ambiguous {
                kind,
                identifier,
                candidates,
            } => Self::Ambiguous {
                kind,
                identifier,
                candidates: candidates.join(", "),
            },
            CoreError::UnknownCommand { name, valid } => Self::UnknownCommand {
                name,
                valid: valid.join(", "),
            },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::JobTimeout {
                job_id,
                attempts,
                last_status,
                ..
            } => Self::JobTimeout {
                job_id,
                attempts,
                last_status: last_status.unwrap_or_else(|| "unknown".into()),
            },
            CoreError::JobFailed { job_id, status } => Self::JobFailed { job_id, status },
            CoreError::RemoteApi {
                message, resource, ..
            } => Self::RemoteApi {
                command: "request".into(),
                target: resource.unwrap_or_else(|| "NSX Manager".into()),
                message,
            },
            CoreError::Deserialization { message } => Self::UnexpectedResponse { message },
            CoreError::Schema { message } => Self::Schema { message },
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
        }
    }
}
