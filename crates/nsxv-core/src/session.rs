// ── NSX Manager session setup ──
//
// NSX Manager speaks HTTP basic auth on every request, so "connecting"
// means loading the API schema and building the client. Nothing is sent
// until the first operation.

use tracing::debug;

use nsxv_api::{ApiSchema, NsxClient};

use crate::config::{NsxConfig, SchemaSource};
use crate::error::CoreError;

/// Build an `NsxClient` for the configured manager.
pub fn connect_nsx(config: &NsxConfig) -> Result<NsxClient, CoreError> {
    let schema = match &config.schema {
        SchemaSource::Bundled => ApiSchema::bundled()?,
        SchemaSource::File(path) => ApiSchema::from_path(path)?,
    };
    debug!(url = %config.url, user = %config.username, "NSX Manager client ready");

    Ok(NsxClient::new(
        config.url.clone(),
        config.username.clone(),
        config.password.clone(),
        schema,
        &config.transport(),
    )?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::TlsVerification;
    use secrecy::SecretString;
    use std::time::Duration;

    fn config(schema: SchemaSource) -> NsxConfig {
        NsxConfig {
            url: "https://nsxmanager.corp.local".parse().unwrap(),
            username: "admin".into(),
            password: SecretString::from("default".to_owned()),
            schema,
            tls: TlsVerification::DangerAcceptInvalid,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn bundled_schema_connects() {
        let client = connect_nsx(&config(SchemaSource::Bundled)).unwrap();
        assert_eq!(client.base_url().host_str(), Some("nsxmanager.corp.local"));
        assert!(client.schema().resource("nwfabricConfig").is_ok());
    }

    #[test]
    fn missing_schema_file_is_a_schema_error() {
        let result = connect_nsx(&config(SchemaSource::File("/nonexistent/nsxvapi.raml".into())));
        assert!(matches!(result, Err(CoreError::Schema { .. })));
    }
}
