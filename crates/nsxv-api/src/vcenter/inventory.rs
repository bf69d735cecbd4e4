// vCenter inventory listings
//
// Datacenters, folders, clusters and hosts with the list filters the
// Automation API supports. Filters are ANDed across kinds and ORed within
// a kind, mirroring the server semantics.

use tracing::debug;

use crate::error::Error;
use crate::vcenter::client::VcenterClient;
use crate::vcenter::models::{
    ClusterSummary, DatacenterSummary, FolderSummary, FolderType, HostSummary,
};

/// Query filter for inventory listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub names: Vec<String>,
    pub datacenters: Vec<String>,
    pub folders: Vec<String>,
    pub parent_folders: Vec<String>,
    pub clusters: Vec<String>,
    pub folder_type: Option<FolderType>,
}

impl InventoryFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            ..Self::default()
        }
    }

    pub fn in_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenters.push(datacenter.into());
        self
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folders.push(folder.into());
        self
    }

    pub fn under_folder(mut self, folder: impl Into<String>) -> Self {
        self.parent_folders.push(folder.into());
        self
    }

    pub fn in_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.clusters.push(cluster.into());
        self
    }

    pub fn of_type(mut self, folder_type: FolderType) -> Self {
        self.folder_type = Some(folder_type);
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let lists: [(&'static str, &Vec<String>); 5] = [
            ("names", &self.names),
            ("datacenters", &self.datacenters),
            ("folders", &self.folders),
            ("parent_folders", &self.parent_folders),
            ("clusters", &self.clusters),
        ];
        for (key, values) in lists {
            query.extend(values.iter().map(|v| (key, v.clone())));
        }
        if let Some(t) = self.folder_type {
            query.push(("type", t.as_str().to_owned()));
        }
        query
    }

    /// The filter restricted to the keys an endpoint accepts.
    fn only(&self, keys: &[&str]) -> Vec<(&'static str, String)> {
        self.to_query()
            .into_iter()
            .filter(|(k, _)| keys.contains(k))
            .collect()
    }
}

impl VcenterClient {
    /// `GET /api/vcenter/datacenter`
    pub async fn list_datacenters(
        &self,
        filter: &InventoryFilter,
    ) -> Result<Vec<DatacenterSummary>, Error> {
        debug!(?filter, "listing datacenters");
        self.get("vcenter/datacenter", &filter.only(&["names", "folders"]))
            .await
    }

    /// `GET /api/vcenter/folder`
    pub async fn list_folders(&self, filter: &InventoryFilter) -> Result<Vec<FolderSummary>, Error> {
        debug!(?filter, "listing folders");
        self.get(
            "vcenter/folder",
            &filter.only(&["names", "datacenters", "parent_folders", "type"]),
        )
        .await
    }

    /// `GET /api/vcenter/cluster`
    pub async fn list_clusters(
        &self,
        filter: &InventoryFilter,
    ) -> Result<Vec<ClusterSummary>, Error> {
        debug!(?filter, "listing clusters");
        self.get(
            "vcenter/cluster",
            &filter.only(&["names", "datacenters", "folders"]),
        )
        .await
    }

    /// `GET /api/vcenter/host`
    pub async fn list_hosts(&self, filter: &InventoryFilter) -> Result<Vec<HostSummary>, Error> {
        debug!(?filter, "listing hosts");
        self.get(
            "vcenter/host",
            &filter.only(&["names", "datacenters", "folders", "clusters"]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_renders_repeated_keys() {
        let filter = InventoryFilter::named("cl1")
            .in_datacenter("datacenter-2")
            .in_folder("group-h4")
            .in_folder("group-h5");
        assert_eq!(
            filter.to_query(),
            vec![
                ("names", "cl1".to_owned()),
                ("datacenters", "datacenter-2".to_owned()),
                ("folders", "group-h4".to_owned()),
                ("folders", "group-h5".to_owned()),
            ]
        );
    }

    #[test]
    fn endpoint_keys_are_restricted() {
        let filter = InventoryFilter::named("x")
            .in_cluster("domain-c7")
            .of_type(FolderType::Host);
        assert_eq!(filter.only(&["names"]), vec![("names", "x".to_owned())]);
        assert!(filter.only(&["type"]).contains(&("type", "HOST".to_owned())));
    }
}
