// vCenter HTTP client
//
// Session lifecycle (`POST`/`DELETE /api/session`) plus a JSON GET helper.
// Inventory listings are inherent methods in `inventory.rs`.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const SESSION_HEADER: &str = "vmware-api-session-id";

/// Raw HTTP client for the vSphere Automation REST API.
pub struct VcenterClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token issued by `POST /api/session`.
    session: RwLock<Option<SecretString>>,
}

impl VcenterClient {
    /// Create a client from a `TransportConfig`. No session is opened yet.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            session: RwLock::new(None),
        }
    }

    /// The vCenter base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether `login()` has succeeded and `logout()` has not been called.
    pub fn is_logged_in(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    // ── Session management ───────────────────────────────────────────

    /// Create an API session.
    ///
    /// `POST /api/session` with basic auth; the body is the quoted token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("session")?;
        debug!("POST {} (login as {username})", url);

        let resp = self
            .http
            .post(url)
            .basic_auth(username, Some(password.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("vCenter rejected the credentials for {username} (HTTP {status})"),
            });
        }
        let body = Self::check_status("session", resp).await?;

        let token: String = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("session token: {e}"),
            body: body.clone(),
        })?;
        *self.session.write().expect("session lock poisoned") = Some(SecretString::from(token));
        debug!("vCenter session established");
        Ok(())
    }

    /// Delete the current session. A failed logout is logged, not returned.
    pub async fn logout(&self) -> Result<(), Error> {
        let Some(token) = self.session.write().expect("session lock poisoned").take() else {
            return Ok(());
        };
        let url = self.api_url("session")?;
        debug!("DELETE {}", url);

        let result = self
            .http
            .delete(url)
            .header(SESSION_HEADER, token.expose_secret())
            .send()
            .await;
        match result {
            Ok(resp) if !resp.status().is_success() => {
                warn!(status = %resp.status(), "vCenter logout was not accepted");
            }
            Err(e) => warn!(error = %e, "vCenter logout failed"),
            Ok(_) => {}
        }
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// GET a JSON resource under `/api` with query parameters.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let token = self
            .session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
            .ok_or(Error::NotLoggedIn)?;
        let url = self.api_url(path)?;
        debug!("GET {} {:?}", url, query);

        let resp = self
            .http
            .get(url)
            .header(SESSION_HEADER, token)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "vCenter session expired or invalid".into(),
            });
        }
        let body = Self::check_status(path, resp).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{path}: {e}"),
            body,
        })
    }

    async fn check_status(resource: &str, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if status.is_success() {
            return Ok(body);
        }

        // vSphere errors look like {"error_type": "...", "messages": [{"default_message": "..."}]}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("messages")?
                    .get(0)?
                    .get("default_message")?
                    .as_str()
                    .map(String::from)
            })
            .unwrap_or_else(|| body.chars().take(200).collect());

        Err(Error::Api {
            status: status.as_u16(),
            resource: resource.to_owned(),
            message,
        })
    }
}
