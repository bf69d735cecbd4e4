// NSX Manager HTTP client
//
// Wraps `reqwest::Client` with schema-driven URL construction, basic auth
// and XML body handling. Typed endpoints are implemented as inherent
// methods in `endpoints.rs` to keep this module focused on transport.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::nsx::models::ErrorBody;
use crate::schema::{ApiSchema, Method};
use crate::transport::TransportConfig;

const XML_CONTENT_TYPE: &str = "application/xml";

/// Result of a create or delete call.
///
/// NSX returns the id of the new object (or of the job tracking it)
/// either as the plain-text body or in the `Location` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectResponse {
    pub status: u16,
    pub object_id: Option<String>,
    pub location: Option<String>,
}

/// Authenticated session against an NSX Manager.
///
/// Requests are addressed by RAML display name; the schema supplies the
/// URI template and the request body templates.
pub struct NsxClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    schema: ApiSchema,
}

impl NsxClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the manager root (e.g. `https://nsxmanager.corp`); the
    /// schema's base path (`/api`) is appended per request.
    pub fn new(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        schema: ApiSchema,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, password, schema))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        schema: ApiSchema,
    ) -> Self {
        Self {
            http,
            base_url,
            username: username.into(),
            password,
            schema,
        }
    }

    /// The NSX Manager base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API schema requests are resolved against.
    pub fn schema(&self) -> &ApiSchema {
        &self.schema
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Full URL for a resource, checking that `method` is declared.
    pub(crate) fn resource_url(
        &self,
        resource: &str,
        method: Method,
        uri_params: &[(&str, &str)],
    ) -> Result<Url, Error> {
        let spec = self.schema.resource(resource)?;
        spec.method(method)?;
        let path = spec.uri(uri_params)?;
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.schema.base_path().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{prefix}{path}"))?)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };
        builder
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(reqwest::header::ACCEPT, XML_CONTENT_TYPE)
    }

    // ── Generic calls ────────────────────────────────────────────────

    /// GET a resource and deserialize its XML body.
    pub async fn read<T: DeserializeOwned>(
        &self,
        resource: &str,
        uri_params: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.resource_url(resource, Method::Get, uri_params)?;
        debug!("GET {} ({resource})", url);

        let resp = self
            .request(Method::Get, url)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = Self::check_status(resource, resp).await?;
        parse_xml(&body)
    }

    /// POST an XML body to a resource.
    pub async fn create(
        &self,
        resource: &str,
        uri_params: &[(&str, &str)],
        body: &str,
    ) -> Result<ObjectResponse, Error> {
        let url = self.resource_url(resource, Method::Post, uri_params)?;
        debug!("POST {} ({resource})", url);
        trace!(%body, "request body");

        let resp = self
            .request(Method::Post, url)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body.to_owned())
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::object_response(resource, resp).await
    }

    /// DELETE a resource, optionally with an XML body.
    pub async fn delete(
        &self,
        resource: &str,
        uri_params: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<ObjectResponse, Error> {
        let url = self.resource_url(resource, Method::Delete, uri_params)?;
        debug!("DELETE {} ({resource})", url);

        let mut builder = self.request(Method::Delete, url);
        if let Some(body) = body {
            trace!(%body, "request body");
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
                .body(body.to_owned());
        }
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::object_response(resource, resp).await
    }

    /// The schema's example body for `method` on `resource`.
    pub fn extract_resource_body_example(
        &self,
        resource: &str,
        method: Method,
    ) -> Result<String, Error> {
        self.schema.body_example(resource, method).map(str::to_owned)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn object_response(resource: &str, resp: reqwest::Response) -> Result<ObjectResponse, Error> {
        let status = resp.status().as_u16();
        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = Self::check_status(resource, resp).await?;
        let object_id = Some(body.trim())
            .filter(|b| !b.is_empty() && !b.starts_with('<'))
            .map(String::from)
            .or_else(|| {
                location
                    .as_deref()
                    .and_then(|l| l.trim_end_matches('/').rsplit('/').next())
                    .filter(|id| !id.is_empty())
                    .map(String::from)
            });

        Ok(ObjectResponse {
            status,
            object_id,
            location,
        })
    }

    /// Map non-success statuses to errors, returning the body text on success.
    async fn check_status(resource: &str, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "NSX Manager rejected the credentials (HTTP 401)".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Api {
                status: status.as_u16(),
                resource: resource.to_owned(),
                message: "insufficient permissions (HTTP 403)".into(),
            });
        }

        if !status.is_success() {
            let message = quick_xml::de::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| match (e.details, e.error_code) {
                    (Some(details), Some(code)) => Some(format!("{details} (code {code})")),
                    (Some(details), None) => Some(details),
                    _ => None,
                })
                .unwrap_or_else(|| preview(&body).to_owned());
            return Err(Error::Api {
                status: status.as_u16(),
                resource: resource.to_owned(),
                message,
            });
        }

        Ok(body)
    }
}

/// Deserialize an XML document, keeping the raw body on failure.
pub(crate) fn parse_xml<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    quick_xml::de::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
