// ── Managed object identifiers ──
//
// vCenter addresses every inventory object by a managed object reference
// id (`domain-c7`, `host-12`, `group-h4`). NSX Manager accepts the same
// strings wherever it takes a resource id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Managed object id of a vCenter inventory object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Moid(String);

impl Moid {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Moid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Moid {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for Moid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Moid {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for Moid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn moid_round_trips_through_display() {
        let id: Moid = "domain-c7".parse().unwrap();
        assert_eq!(id.to_string(), "domain-c7");
        assert_eq!(id.as_str(), "domain-c7");
    }

    #[test]
    fn moid_is_opaque() {
        // No validation: whatever the caller supplies is passed through.
        let id = Moid::from("not a real moid");
        assert_eq!(id.as_ref(), "not a real moid");
    }

    #[test]
    fn moid_serializes_as_plain_string() {
        let id = Moid::from("host-12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"host-12\"");
        let back: Moid = serde_json::from_str("\"host-12\"").unwrap();
        assert_eq!(back, id);
    }
}
