// ── Core error types ──
//
// User-facing errors from nsxv-core. Transport details (HTTP status codes,
// XML parse failures) are folded into domain variants by the
// `From<nsxv_api::Error>` impl below.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Resolution errors ────────────────────────────────────────────
    #[error("{kind} '{identifier}' not found")]
    NotFound { kind: String, identifier: String },

    #[error("Inventory path '{path}' has no '{segment}'")]
    PathSegmentNotFound { path: String, segment: String },

    #[error("{kind} name '{identifier}' matches {} objects: {}", .candidates.len(), .candidates.join(", "))]
    Ambiguous {
        kind: String,
        identifier: String,
        candidates: Vec<String>,
    },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String, valid: Vec<String> },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Job errors ───────────────────────────────────────────────────
    #[error("Job {job_id} did not reach {target} after {attempts} polls (last status: {})", .last_status.as_deref().unwrap_or("none"))]
    JobTimeout {
        job_id: String,
        target: String,
        attempts: u32,
        last_status: Option<String>,
    },

    #[error("Job {job_id} ended with status {status}")]
    JobFailed { job_id: String, status: String },

    // ── Remote API errors (wrapped, not exposed raw) ─────────────────
    #[error("API error: {message}")]
    RemoteApi {
        message: String,
        /// The schema resource or REST path that failed.
        resource: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response shape: {message}")]
    Deserialization { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("API schema error: {message}")]
    Schema { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn not_found(kind: impl std::fmt::Display, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            identifier: identifier.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nsxv_api::Error> for CoreError {
    fn from(err: nsxv_api::Error) -> Self {
        use nsxv_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::NotLoggedIn => CoreError::AuthenticationFailed {
                message: "no vCenter session".into(),
            },
            ApiError::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::RemoteApi {
                        message: e.to_string(),
                        resource: e.url().map(|u| u.path().to_owned()),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::Api {
                status,
                resource,
                message,
            } => CoreError::RemoteApi {
                message,
                resource: Some(resource),
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
            e @ (ApiError::Schema { .. }
            | ApiError::UnknownResource { .. }
            | ApiError::UnsupportedMethod { .. }
            | ApiError::MissingUriParameter { .. }) => CoreError::Schema {
                message: e.to_string(),
            },
        }
    }
}
