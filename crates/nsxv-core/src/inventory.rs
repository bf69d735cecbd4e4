// ── Inventory resolution ──
//
// Turns human references to vCenter objects (an inventory path such as
// `DC1/host/Compute` or a bare object name) into managed object ids.
// Resolution is read-only and needs an open vCenter session.

use std::future::Future;

use strum::{Display, EnumString};
use tracing::debug;

use nsxv_api::VcenterClient;
use nsxv_api::vcenter::{FolderType, InventoryFilter};

use crate::config::VcenterConfig;
use crate::error::CoreError;
use crate::moid::Moid;

// ── Nodes ───────────────────────────────────────────────────────────

/// The kinds of inventory object a path can walk through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InventoryKind {
    Datacenter,
    Folder,
    Cluster,
    Host,
}

/// One object in the vCenter inventory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryNode {
    pub moid: Moid,
    pub name: String,
    pub kind: InventoryKind,
}

impl InventoryNode {
    pub fn new(moid: impl Into<Moid>, name: impl Into<String>, kind: InventoryKind) -> Self {
        Self {
            moid: moid.into(),
            name: name.into(),
            kind,
        }
    }
}

// ── Inventory ───────────────────────────────────────────────────────

/// Name-based lookups over an inventory tree.
pub trait Inventory: Sync {
    /// Datacenters called `name`.
    fn datacenters(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<InventoryNode>, CoreError>> + Send;

    /// Direct children of `parent` called `name`.
    fn children(
        &self,
        parent: &InventoryNode,
        name: &str,
    ) -> impl Future<Output = Result<Vec<InventoryNode>, CoreError>> + Send;

    /// Every object of `kind` called `name`, anywhere in the tree.
    fn find_by_name(
        &self,
        kind: InventoryKind,
        name: &str,
    ) -> impl Future<Output = Result<Vec<InventoryNode>, CoreError>> + Send;
}

// ── Resolver ────────────────────────────────────────────────────────

/// Resolves inventory paths and names against an [`Inventory`].
pub struct InventoryResolver<'a, I: ?Sized> {
    inventory: &'a I,
}

impl<'a, I: Inventory + ?Sized> InventoryResolver<'a, I> {
    pub fn new(inventory: &'a I) -> Self {
        Self { inventory }
    }

    /// Walk `path` from its datacenter down and return the moid of the
    /// final object, which must be of kind `expected`.
    ///
    /// Empty segments are ignored, so `/DC1/host/Compute/` and
    /// `DC1/host/Compute` are the same path.
    pub async fn resolve_path(&self, path: &str, expected: InventoryKind) -> Result<Moid, CoreError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((root, rest)) = segments.split_first() else {
            return Err(CoreError::ValidationFailed {
                message: format!("inventory path '{path}' is empty"),
            });
        };

        let missing = |segment: &str| CoreError::PathSegmentNotFound {
            path: path.to_owned(),
            segment: segment.to_owned(),
        };

        let datacenters = self.inventory.datacenters(root).await?;
        let mut current = single(datacenters, InventoryKind::Datacenter, root)?
            .ok_or_else(|| missing(root))?;

        for (idx, segment) in rest.iter().enumerate() {
            let mut candidates = self.inventory.children(&current, segment).await?;
            if candidates.is_empty() {
                return Err(missing(segment));
            }
            let last = idx + 1 == rest.len();
            if last {
                candidates.retain(|n| n.kind == expected);
            }
            current = single(candidates, expected, segment)?
                .ok_or_else(|| CoreError::not_found(expected, path))?;
        }

        if current.kind != expected {
            return Err(CoreError::not_found(expected, path));
        }
        debug!(path, moid = %current.moid, "resolved inventory path");
        Ok(current.moid)
    }

    /// Find the single object of `kind` named `name`.
    ///
    /// Several objects sharing the name is an error, never a guess.
    pub async fn resolve_name(&self, kind: InventoryKind, name: &str) -> Result<Moid, CoreError> {
        let matches: Vec<InventoryNode> = self
            .inventory
            .find_by_name(kind, name)
            .await?
            .into_iter()
            .filter(|n| n.kind == kind && n.name == name)
            .collect();

        let node = single(matches, kind, name)?.ok_or_else(|| CoreError::not_found(kind, name))?;
        debug!(name, moid = %node.moid, "resolved {kind} name");
        Ok(node.moid)
    }
}

/// `None` for no nodes, the node for one, `Ambiguous` for more.
fn single(
    mut nodes: Vec<InventoryNode>,
    kind: InventoryKind,
    identifier: &str,
) -> Result<Option<InventoryNode>, CoreError> {
    match nodes.len() {
        0 => Ok(None),
        1 => Ok(nodes.pop()),
        _ => Err(CoreError::Ambiguous {
            kind: kind.to_string(),
            identifier: identifier.to_owned(),
            candidates: nodes.into_iter().map(|n| n.moid.to_string()).collect(),
        }),
    }
}

// ── VcenterInventory ────────────────────────────────────────────────

/// [`Inventory`] backed by the vSphere Automation API.
pub struct VcenterInventory {
    client: VcenterClient,
}

impl VcenterInventory {
    /// Open a vCenter session.
    pub async fn connect(config: &VcenterConfig) -> Result<Self, CoreError> {
        let client = VcenterClient::new(config.url.clone(), &config.transport())?;
        client.login(&config.username, &config.password).await?;
        debug!(url = %config.url, "vCenter session open");
        Ok(Self { client })
    }

    pub fn client(&self) -> &VcenterClient {
        &self.client
    }

    /// Close the vCenter session.
    pub async fn close(&self) -> Result<(), CoreError> {
        Ok(self.client.logout().await?)
    }

    async fn datacenter_nodes(&self, filter: InventoryFilter) -> Result<Vec<InventoryNode>, CoreError> {
        Ok(self
            .client
            .list_datacenters(&filter)
            .await?
            .into_iter()
            .map(|d| InventoryNode::new(d.datacenter, d.name, InventoryKind::Datacenter))
            .collect())
    }

    async fn folder_nodes(&self, filter: InventoryFilter) -> Result<Vec<InventoryNode>, CoreError> {
        Ok(self
            .client
            .list_folders(&filter)
            .await?
            .into_iter()
            .map(|f| InventoryNode::new(f.folder, f.name, InventoryKind::Folder))
            .collect())
    }

    async fn cluster_nodes(&self, filter: InventoryFilter) -> Result<Vec<InventoryNode>, CoreError> {
        Ok(self
            .client
            .list_clusters(&filter)
            .await?
            .into_iter()
            .map(|c| InventoryNode::new(c.cluster, c.name, InventoryKind::Cluster))
            .collect())
    }

    async fn host_nodes(&self, filter: InventoryFilter) -> Result<Vec<InventoryNode>, CoreError> {
        Ok(self
            .client
            .list_hosts(&filter)
            .await?
            .into_iter()
            .map(|h| InventoryNode::new(h.host, h.name, InventoryKind::Host))
            .collect())
    }
}

impl Inventory for VcenterInventory {
    async fn datacenters(&self, name: &str) -> Result<Vec<InventoryNode>, CoreError> {
        self.datacenter_nodes(InventoryFilter::named(name)).await
    }

    async fn children(
        &self,
        parent: &InventoryNode,
        name: &str,
    ) -> Result<Vec<InventoryNode>, CoreError> {
        let parent_id = parent.moid.as_str();
        match parent.kind {
            // Only the fixed top-level folders hang directly off a datacenter.
            InventoryKind::Datacenter => match FolderType::of_root_folder(name) {
                Some(folder_type) => {
                    self.folder_nodes(
                        InventoryFilter::named(name)
                            .in_datacenter(parent_id)
                            .of_type(folder_type),
                    )
                    .await
                }
                None => Ok(Vec::new()),
            },
            InventoryKind::Folder => {
                let mut nodes = self
                    .folder_nodes(InventoryFilter::named(name).under_folder(parent_id))
                    .await?;
                nodes.extend(
                    self.cluster_nodes(InventoryFilter::named(name).in_folder(parent_id))
                        .await?,
                );
                nodes.extend(
                    self.host_nodes(InventoryFilter::named(name).in_folder(parent_id))
                        .await?,
                );
                Ok(nodes)
            }
            InventoryKind::Cluster => {
                self.host_nodes(InventoryFilter::named(name).in_cluster(parent_id))
                    .await
            }
            InventoryKind::Host => Ok(Vec::new()),
        }
    }

    async fn find_by_name(
        &self,
        kind: InventoryKind,
        name: &str,
    ) -> Result<Vec<InventoryNode>, CoreError> {
        let filter = InventoryFilter::named(name);
        match kind {
            InventoryKind::Datacenter => self.datacenter_nodes(filter).await,
            InventoryKind::Folder => self.folder_nodes(filter).await,
            InventoryKind::Cluster => self.cluster_nodes(filter).await,
            InventoryKind::Host => self.host_nodes(filter).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// In-memory inventory: a flat list of (parent moid, node) edges.
    pub(crate) struct StubInventory {
        edges: Vec<(Option<&'static str>, InventoryNode)>,
    }

    impl StubInventory {
        /// ```text
        /// DC1 (datacenter-2)
        /// └── host (group-h4)
        ///     ├── Compute (domain-c7)
        ///     │   ├── esx01 (host-12)
        ///     │   └── esx02 (host-13)
        ///     ├── Edge (domain-c9)
        ///     │   └── esx01 (host-30)
        ///     └── Lab (group-h10)
        ///         └── Compute (domain-c20)
        /// ```
        pub(crate) fn sample() -> Self {
            use InventoryKind::{Cluster, Datacenter, Folder, Host};
            Self {
                edges: vec![
                    (None, InventoryNode::new("datacenter-2", "DC1", Datacenter)),
                    (Some("datacenter-2"), InventoryNode::new("group-h4", "host", Folder)),
                    (Some("group-h4"), InventoryNode::new("domain-c7", "Compute", Cluster)),
                    (Some("group-h4"), InventoryNode::new("domain-c9", "Edge", Cluster)),
                    (Some("group-h4"), InventoryNode::new("group-h10", "Lab", Folder)),
                    (Some("group-h10"), InventoryNode::new("domain-c20", "Compute", Cluster)),
                    (Some("domain-c7"), InventoryNode::new("host-12", "esx01", Host)),
                    (Some("domain-c7"), InventoryNode::new("host-13", "esx02", Host)),
                    (Some("domain-c9"), InventoryNode::new("host-30", "esx01", Host)),
                ],
            }
        }
    }

    impl Inventory for StubInventory {
        async fn datacenters(&self, name: &str) -> Result<Vec<InventoryNode>, CoreError> {
            Ok(self
                .edges
                .iter()
                .filter(|(p, n)| p.is_none() && n.name == name)
                .map(|(_, n)| n.clone())
                .collect())
        }

        async fn children(
            &self,
            parent: &InventoryNode,
            name: &str,
        ) -> Result<Vec<InventoryNode>, CoreError> {
            Ok(self
                .edges
                .iter()
                .filter(|(p, n)| *p == Some(parent.moid.as_str()) && n.name == name)
                .map(|(_, n)| n.clone())
                .collect())
        }

        async fn find_by_name(
            &self,
            kind: InventoryKind,
            name: &str,
        ) -> Result<Vec<InventoryNode>, CoreError> {
            Ok(self
                .edges
                .iter()
                .filter(|(_, n)| n.kind == kind && n.name == name)
                .map(|(_, n)| n.clone())
                .collect())
        }
    }

    #[tokio::test]
    async fn path_resolves_cluster() {
        let inv = StubInventory::sample();
        let moid = InventoryResolver::new(&inv)
            .resolve_path("DC1/host/Compute", InventoryKind::Cluster)
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("domain-c7"));
    }

    #[tokio::test]
    async fn path_ignores_empty_segments() {
        let inv = StubInventory::sample();
        let moid = InventoryResolver::new(&inv)
            .resolve_path("/DC1//host/Lab/Compute/", InventoryKind::Cluster)
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("domain-c20"));
    }

    #[tokio::test]
    async fn path_resolves_host_inside_cluster() {
        let inv = StubInventory::sample();
        let moid = InventoryResolver::new(&inv)
            .resolve_path("DC1/host/Edge/esx01", InventoryKind::Host)
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("host-30"));
    }

    #[tokio::test]
    async fn missing_segment_is_named() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_path("DC1/host/Nope/esx01", InventoryKind::Host)
            .await
            .unwrap_err();
        match err {
            CoreError::PathSegmentNotFound { path, segment } => {
                assert_eq!(path, "DC1/host/Nope/esx01");
                assert_eq!(segment, "Nope");
            }
            other => panic!("expected PathSegmentNotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_datacenter_is_named() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_path("DC9/host/Compute", InventoryKind::Cluster)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, CoreError::PathSegmentNotFound { segment, .. } if segment == "DC9"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn path_to_wrong_kind_is_not_found() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_path("DC1/host/Lab", InventoryKind::Cluster)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, CoreError::NotFound { kind, .. } if kind == "cluster"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn empty_path_is_rejected() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_path("//", InventoryKind::Cluster)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn unique_name_resolves() {
        let inv = StubInventory::sample();
        let moid = InventoryResolver::new(&inv)
            .resolve_name(InventoryKind::Cluster, "Edge")
            .await
            .unwrap();
        assert_eq!(moid, Moid::from("domain-c9"));
    }

    #[tokio::test]
    async fn duplicate_name_is_ambiguous() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_name(InventoryKind::Cluster, "Compute")
            .await
            .unwrap_err();
        match err {
            CoreError::Ambiguous {
                kind, candidates, ..
            } => {
                assert_eq!(kind, "cluster");
                assert_eq!(candidates, vec!["domain-c7", "domain-c20"]);
            }
            other => panic!("expected Ambiguous, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let inv = StubInventory::sample();
        let err = InventoryResolver::new(&inv)
            .resolve_name(InventoryKind::Host, "esx99")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn kind_parses_lowercase() {
        assert_eq!("host".parse::<InventoryKind>().unwrap(), InventoryKind::Host);
        assert_eq!(InventoryKind::Datacenter.to_string(), "datacenter");
    }
}
