// ── Command vocabulary ──
//
// The closed set of operations per command module, and the three ways a
// user can point at the object an operation acts on.

use std::fmt::Display;
use std::str::FromStr;

use strum::{EnumIter, EnumMessage, EnumString, IntoEnumIterator};

use crate::error::CoreError;
use crate::inventory::{Inventory, InventoryKind, InventoryResolver};
use crate::moid::Moid;

// ── Commands ────────────────────────────────────────────────────────

/// Operations of the `cluster` module.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString, EnumIter, EnumMessage,
)]
#[strum(serialize_all = "snake_case")]
pub enum ClusterCommand {
    #[strum(message = "Show the network fabric feature status of a cluster")]
    ShowNwfabricStatus,
    #[strum(message = "Prepare a cluster for network virtualization")]
    InstallNetworkVirtualization,
    #[strum(message = "Remove network virtualization from a cluster")]
    UninstallNetworkVirtualization,
}

/// Operations of the `host` module.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, EnumString, EnumIter, EnumMessage,
)]
#[strum(serialize_all = "snake_case")]
pub enum HostCommand {
    #[strum(message = "Show the communication status between NSX Manager and a host")]
    CommunicationStatus,
}

/// Parse a command name into its enum, listing the valid names on failure.
pub fn parse_command<C>(name: &str) -> Result<C, CoreError>
where
    C: FromStr + IntoEnumIterator + Display,
{
    name.parse::<C>().map_err(|_| CoreError::UnknownCommand {
        name: name.to_owned(),
        valid: C::iter().map(|c| c.to_string()).collect(),
    })
}

// ── Target selection ────────────────────────────────────────────────

/// How the user identified the object to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// A managed object id, used verbatim.
    Moid(Moid),
    /// A `/`-separated vCenter inventory path starting at a datacenter.
    InventoryPath(String),
    /// An object name that must be unique within its kind.
    Name(String),
}

impl TargetSelector {
    /// Build a selector from the three mutually exclusive CLI flags.
    pub fn from_flags(
        moid: Option<String>,
        path: Option<String>,
        name: Option<String>,
    ) -> Result<Self, CoreError> {
        match (moid, path, name) {
            (Some(m), None, None) => Ok(Self::Moid(Moid::from(m))),
            (None, Some(p), None) => Ok(Self::InventoryPath(p)),
            (None, None, Some(n)) => Ok(Self::Name(n)),
            _ => Err(CoreError::ValidationFailed {
                message: "exactly one of moid, inventory path or name is required".into(),
            }),
        }
    }

    /// The moid if it was given directly. No lookup is needed then.
    pub fn literal_moid(&self) -> Option<&Moid> {
        match self {
            Self::Moid(m) => Some(m),
            Self::InventoryPath(_) | Self::Name(_) => None,
        }
    }

    /// Turn the selector into a moid of `kind`.
    ///
    /// A literal moid never touches the inventory.
    pub async fn resolve<I: Inventory + ?Sized>(
        &self,
        kind: InventoryKind,
        inventory: &I,
    ) -> Result<Moid, CoreError> {
        let resolver = InventoryResolver::new(inventory);
        match self {
            Self::Moid(m) => Ok(m.clone()),
            Self::InventoryPath(path) => resolver.resolve_path(path, kind).await,
            Self::Name(name) => resolver.resolve_name(kind, name).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::InventoryNode;
    use crate::inventory::tests::StubInventory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cluster_commands_parse_from_snake_case() {
        assert_eq!(
            parse_command::<ClusterCommand>("show_nwfabric_status").unwrap(),
            ClusterCommand::ShowNwfabricStatus
        );
        assert_eq!(
            parse_command::<ClusterCommand>("uninstall_network_virtualization").unwrap(),
            ClusterCommand::UninstallNetworkVirtualization
        );
        assert_eq!(
            HostCommand::CommunicationStatus.to_string(),
            "communication_status"
        );
    }

    #[test]
    fn unknown_command_lists_valid_names() {
        let err = parse_command::<ClusterCommand>("frobnicate").unwrap_err();
        match err {
            CoreError::UnknownCommand { name, valid } => {
                assert_eq!(name, "frobnicate");
                assert_eq!(
                    valid,
                    vec![
                        "show_nwfabric_status",
                        "install_network_virtualization",
                        "uninstall_network_virtualization"
                    ]
                );
            }
            other => panic!("expected UnknownCommand, got: {other:?}"),
        }
    }

    #[test]
    fn commands_carry_descriptions() {
        for cmd in ClusterCommand::iter() {
            assert!(cmd.get_message().is_some(), "{cmd} has no description");
        }
    }

    #[test]
    fn exactly_one_flag_is_accepted() {
        assert_eq!(
            TargetSelector::from_flags(Some("domain-c7".into()), None, None).unwrap(),
            TargetSelector::Moid(Moid::from("domain-c7"))
        );
        assert!(TargetSelector::from_flags(None, None, None).is_err());
        assert!(
            TargetSelector::from_flags(Some("domain-c7".into()), None, Some("Compute".into()))
                .is_err()
        );
    }

    /// Fails every lookup, proving a moid selector never consults it.
    struct UnreachableInventory;

    impl Inventory for UnreachableInventory {
        async fn datacenters(&self, _name: &str) -> Result<Vec<InventoryNode>, CoreError> {
            panic!("inventory consulted")
        }
        async fn children(
            &self,
            _parent: &InventoryNode,
            _name: &str,
        ) -> Result<Vec<InventoryNode>, CoreError> {
            panic!("inventory consulted")
        }
        async fn find_by_name(
            &self,
            _kind: InventoryKind,
            _name: &str,
        ) -> Result<Vec<InventoryNode>, CoreError> {
            panic!("inventory consulted")
        }
    }

    #[tokio::test]
    async fn moid_selector_is_verbatim() {
        let selector = TargetSelector::Moid(Moid::from("domain-c7"));
        let moid = selector
            .resolve(InventoryKind::Cluster, &UnreachableInventory)
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("domain-c7"));
    }

    #[tokio::test]
    async fn path_selector_walks_inventory() {
        let selector = TargetSelector::InventoryPath("DC1/host/Compute/esx02".into());
        let moid = selector
            .resolve(InventoryKind::Host, &StubInventory::sample())
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("host-13"));
    }

    #[tokio::test]
    async fn name_selector_finds_unique_object() {
        let selector = TargetSelector::Name("esx02".into());
        let moid = selector
            .resolve(InventoryKind::Host, &StubInventory::sample())
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("host-13"));
    }
}
