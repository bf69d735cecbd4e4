// RAML API schema
//
// The NSX-V API is published as a RAML 0.8 document. Resources are looked
// up by `displayName`; their URI is the concatenation of the nested
// `/segment` keys under the `baseUri` path. Method bodies carry XML
// examples that double as request templates.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::error::Error;

const BUNDLED_RAML: &str = include_str!("../api_spec/nsxvapi.raml");
const XML_MEDIA_TYPE: &str = "application/xml";

/// HTTP methods a RAML resource may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn from_raml_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method declared on a resource.
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    /// The `application/xml` example body, if the schema carries one inline.
    pub body_example: Option<String>,
    /// Names of the declared query parameters.
    pub query_parameters: Vec<String>,
}

/// A resource addressed by its `displayName`.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub display_name: String,
    /// Path relative to the schema base, e.g. `/2.0/vdn/inventory/host/{hostId}/connection/status`.
    pub uri_template: String,
    pub methods: HashMap<Method, MethodSpec>,
}

impl ResourceSpec {
    /// Substitute `{param}` placeholders in the URI template.
    pub fn uri(&self, params: &[(&str, &str)]) -> Result<String, Error> {
        let mut out = String::with_capacity(self.uri_template.len());
        let mut rest = self.uri_template.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            let name = &rest[open + 1..open + close];
            let value = params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::MissingUriParameter {
                    resource: self.display_name.clone(),
                    parameter: name.to_owned(),
                })?;
            out.push_str(&rest[..open]);
            out.push_str(value);
            rest = &rest[open + close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Look up a declared method, failing if the schema does not allow it.
    pub fn method(&self, method: Method) -> Result<&MethodSpec, Error> {
        self.methods
            .get(&method)
            .ok_or_else(|| Error::UnsupportedMethod {
                resource: self.display_name.clone(),
                method: method.as_str(),
            })
    }
}

/// Parsed RAML schema: the resource model the NSX client issues requests against.
#[derive(Debug, Clone)]
pub struct ApiSchema {
    base_path: String,
    resources: HashMap<String, ResourceSpec>,
}

impl ApiSchema {
    /// The schema compiled into this crate.
    pub fn bundled() -> Result<Self, Error> {
        Self::parse(BUNDLED_RAML)
    }

    /// Read and parse a RAML file from disk.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Schema {
            message: format!("could not read {}: {e}", path.display()),
        })?;
        debug!(path = %path.display(), "loading API schema");
        Self::parse(&text)
    }

    /// Parse RAML text.
    ///
    /// Custom tags such as `!include` are accepted; tagged values are
    /// treated as absent since external fragments are not resolved.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let root: Value = serde_yaml::from_str(text).map_err(|e| Error::Schema {
            message: format!("invalid RAML: {e}"),
        })?;
        let Value::Mapping(root) = root else {
            return Err(Error::Schema {
                message: "RAML document is not a mapping".into(),
            });
        };

        let base_path = root
            .get("baseUri")
            .and_then(Value::as_str)
            .map(base_path_of)
            .unwrap_or_default();

        let mut resources = HashMap::new();
        collect_resources(&root, "", &mut resources)?;
        debug!(count = resources.len(), %base_path, "parsed API schema");

        Ok(Self {
            base_path,
            resources,
        })
    }

    /// Path prefix taken from `baseUri` (e.g. `/api`).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Look up a resource by display name.
    pub fn resource(&self, name: &str) -> Result<&ResourceSpec, Error> {
        self.resources.get(name).ok_or_else(|| Error::UnknownResource {
            name: name.to_owned(),
        })
    }

    /// Example request body for `method` on `name`, used as a request template.
    pub fn body_example(&self, name: &str, method: Method) -> Result<&str, Error> {
        self.resource(name)?
            .method(method)?
            .body_example
            .as_deref()
            .ok_or_else(|| Error::Schema {
                message: format!("{name} {method} has no {XML_MEDIA_TYPE} example body"),
            })
    }

    /// Display names of every resource, sorted.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// `https://{NSXManager}/api` -> `/api`
fn base_path_of(base_uri: &str) -> String {
    let after_scheme = base_uri
        .split_once("://")
        .map_or(base_uri, |(_, rest)| rest);
    after_scheme
        .find('/')
        .map(|i| after_scheme[i..].trim_end_matches('/').to_owned())
        .unwrap_or_default()
}

/// String scalars only; tagged values (`!include ...`) are unresolved references.
fn plain_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn collect_resources(
    node: &serde_yaml::Mapping,
    parent_uri: &str,
    out: &mut HashMap<String, ResourceSpec>,
) -> Result<(), Error> {
    for (key, value) in node {
        let Some(segment) = key.as_str().filter(|k| k.starts_with('/')) else {
            continue;
        };
        let uri = format!("{parent_uri}{segment}");

        // `/foo:` with no body is legal RAML; it declares nothing.
        let Value::Mapping(child) = value else {
            continue;
        };

        if let Some(name) = child.get("displayName").and_then(plain_str) {
            let spec = ResourceSpec {
                display_name: name.to_owned(),
                uri_template: uri.clone(),
                methods: collect_methods(child),
            };
            if out.insert(name.to_owned(), spec).is_some() {
                return Err(Error::Schema {
                    message: format!("duplicate displayName '{name}'"),
                });
            }
        }

        collect_resources(child, &uri, out)?;
    }
    Ok(())
}

fn collect_methods(resource: &serde_yaml::Mapping) -> HashMap<Method, MethodSpec> {
    let mut methods = HashMap::new();
    for (key, value) in resource {
        let Some(method) = key.as_str().and_then(Method::from_raml_key) else {
            continue;
        };

        let body_example = value
            .get("body")
            .and_then(|b| b.get(XML_MEDIA_TYPE))
            .and_then(|m| m.get("example"))
            .and_then(plain_str)
            .map(str::to_owned);

        let query_parameters = value
            .get("queryParameters")
            .and_then(Value::as_mapping)
            .map(|params| {
                params
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        methods.insert(
            method,
            MethodSpec {
                body_example,
                query_parameters,
            },
        );
    }
    methods
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bundled_schema_parses() {
        let schema = ApiSchema::bundled().unwrap();
        assert_eq!(schema.base_path(), "/api");
        for name in [
            "nwfabricStatus",
            "nwfabricConfig",
            "inventoryStatusHost",
            "taskFrameworkJobs",
        ] {
            assert!(schema.resource(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn nested_uri_is_concatenated() {
        let schema = ApiSchema::bundled().unwrap();
        let spec = schema.resource("inventoryStatusHost").unwrap();
        assert_eq!(
            spec.uri_template,
            "/2.0/vdn/inventory/host/{hostId}/connection/status"
        );
        assert_eq!(
            spec.uri(&[("hostId", "host-12")]).unwrap(),
            "/2.0/vdn/inventory/host/host-12/connection/status"
        );
    }

    #[test]
    fn missing_uri_parameter_is_reported() {
        let schema = ApiSchema::bundled().unwrap();
        let spec = schema.resource("taskFrameworkJobs").unwrap();
        let err = spec.uri(&[]).unwrap_err();
        assert!(
            matches!(err, Error::MissingUriParameter { ref parameter, .. } if parameter == "jobId"),
            "got {err:?}"
        );
    }

    #[test]
    fn body_example_is_extracted() {
        let schema = ApiSchema::bundled().unwrap();
        let body = schema.body_example("nwfabricConfig", Method::Post).unwrap();
        assert!(body.contains("<resourceId>"));
        assert!(schema.body_example("nwfabricConfig", Method::Delete).is_ok());
    }

    #[test]
    fn query_parameters_are_listed() {
        let schema = ApiSchema::bundled().unwrap();
        let get = schema
            .resource("nwfabricStatus")
            .unwrap()
            .method(Method::Get)
            .unwrap();
        assert_eq!(get.query_parameters, vec!["resource".to_owned()]);
    }

    #[test]
    fn undeclared_method_is_rejected() {
        let schema = ApiSchema::bundled().unwrap();
        let err = schema
            .resource("nwfabricStatus")
            .unwrap()
            .method(Method::Delete)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod { method: "DELETE", .. }));
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let schema = ApiSchema::bundled().unwrap();
        assert!(matches!(
            schema.resource("nope"),
            Err(Error::UnknownResource { .. })
        ));
    }

    #[test]
    fn include_tags_are_tolerated() {
        let raml = r"
baseUri: https://{NSXManager}/api
/4.0:
  /edges:
    displayName: nsxEdges
    get:
      body:
        application/xml:
          schema: !include schemas/edges.xsd
          example: !include examples/edges.xml
";
        let schema = ApiSchema::parse(raml).unwrap();
        let spec = schema.resource("nsxEdges").unwrap();
        assert_eq!(spec.uri_template, "/4.0/edges");
        assert!(spec.method(Method::Get).unwrap().body_example.is_none());
    }

    #[test]
    fn duplicate_display_names_are_rejected() {
        let raml = "
/a:
  displayName: same
/b:
  displayName: same
";
        assert!(matches!(ApiSchema::parse(raml), Err(Error::Schema { .. })));
    }

    #[test]
    fn schema_is_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.raml");
        std::fs::write(&path, "baseUri: https://x/api/\n/ping:\n  displayName: ping\n  get:\n")
            .unwrap();
        let schema = ApiSchema::from_path(&path).unwrap();
        assert_eq!(schema.base_path(), "/api");
        assert_eq!(schema.resource_names(), vec!["ping"]);
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        assert!(matches!(
            ApiSchema::parse("- just\n- a list\n"),
            Err(Error::Schema { .. })
        ));
    }
}
