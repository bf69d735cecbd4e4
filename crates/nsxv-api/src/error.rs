use thiserror::Error;

/// Top-level error type for the `nsxv-api` crate.
///
/// Covers every failure mode across both API surfaces: the schema-driven
/// NSX Manager API and the vCenter REST API used for inventory lookups.
/// `nsxv-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by NSX Manager or vCenter.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A vCenter call was made before `login()`.
    #[error("No vCenter session -- call login() first")]
    NotLoggedIn,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote API ──────────────────────────────────────────────────
    /// Non-success HTTP response from the remote server.
    #[error("API error on {resource} (HTTP {status}): {message}")]
    Api {
        status: u16,
        resource: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body did not match the expected shape, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Schema ──────────────────────────────────────────────────────
    /// The RAML API schema could not be read or parsed.
    #[error("API schema error: {message}")]
    Schema { message: String },

    /// No resource with this display name exists in the schema.
    #[error("Resource '{name}' is not defined in the API schema")]
    UnknownResource { name: String },

    /// The schema does not declare this method for the resource.
    #[error("Resource '{resource}' does not support {method}")]
    UnsupportedMethod {
        resource: String,
        method: &'static str,
    },

    /// A `{placeholder}` in the resource URI was left unset.
    #[error("Resource '{resource}' requires URI parameter '{parameter}'")]
    MissingUriParameter { resource: String, parameter: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of the failed exchange, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
