// NSX Manager typed endpoints
//
// Network fabric preparation, host communication status and task
// framework jobs.

use tracing::debug;

use crate::error::Error;
use crate::nsx::client::{NsxClient, ObjectResponse};
use crate::nsx::models::{HostConnStatus, JobInstance, JobInstances, NwFabricFeatureStatus, ResourceStatuses};
use crate::nsx::template;
use crate::schema::Method;

pub const NWFABRIC_STATUS: &str = "nwfabricStatus";
pub const NWFABRIC_CONFIG: &str = "nwfabricConfig";
pub const INVENTORY_STATUS_HOST: &str = "inventoryStatusHost";
pub const TASK_FRAMEWORK_JOBS: &str = "taskFrameworkJobs";

const RESOURCE_ID_PATH: &[&str] = &["nwFabricFeatureConfig", "resourceConfig", "resourceId"];

impl NsxClient {
    /// Fabric feature statuses for a resource.
    ///
    /// `GET /api/2.0/nwfabric/status?resource={moid}`
    pub async fn nwfabric_status(&self, moid: &str) -> Result<Vec<NwFabricFeatureStatus>, Error> {
        debug!(moid, "fetching network fabric status");
        let statuses: ResourceStatuses = self
            .read(NWFABRIC_STATUS, &[], &[("resource", moid)])
            .await?;
        Ok(statuses
            .resource_status
            .into_iter()
            .flat_map(|r| r.nw_fabric_feature_status)
            .collect())
    }

    /// Install network virtualization components on a resource.
    ///
    /// `POST /api/2.0/nwfabric/configure` -- returns the tracking job id.
    pub async fn configure_nwfabric(&self, moid: &str) -> Result<String, Error> {
        let body = self.fabric_config_body(Method::Post, moid)?;
        debug!(moid, "submitting network fabric install");
        let resp = self.create(NWFABRIC_CONFIG, &[], &body).await?;
        require_job_id(NWFABRIC_CONFIG, resp)
    }

    /// Remove network virtualization components from a resource.
    ///
    /// `DELETE /api/2.0/nwfabric/configure` -- returns the tracking job id.
    pub async fn unconfigure_nwfabric(&self, moid: &str) -> Result<String, Error> {
        let body = self.fabric_config_body(Method::Delete, moid)?;
        debug!(moid, "submitting network fabric uninstall");
        let resp = self.delete(NWFABRIC_CONFIG, &[], Some(&body)).await?;
        require_job_id(NWFABRIC_CONFIG, resp)
    }

    /// Communication status of a host.
    ///
    /// `GET /api/2.0/vdn/inventory/host/{hostId}/connection/status`
    pub async fn host_connection_status(&self, host_id: &str) -> Result<HostConnStatus, Error> {
        debug!(host_id, "fetching host communication status");
        self.read(INVENTORY_STATUS_HOST, &[("hostId", host_id)], &[])
            .await
    }

    /// Latest instance of a task framework job.
    ///
    /// `GET /api/2.0/services/taskservice/job/{jobId}`
    pub async fn job_instance(&self, job_id: &str) -> Result<JobInstance, Error> {
        let jobs: JobInstances = self
            .read(TASK_FRAMEWORK_JOBS, &[("jobId", job_id)], &[])
            .await?;
        jobs.job_instance
            .into_iter()
            .last()
            .ok_or_else(|| Error::Deserialization {
                message: format!("job {job_id} has no jobInstance"),
                body: String::new(),
            })
    }

    fn fabric_config_body(&self, method: Method, moid: &str) -> Result<String, Error> {
        let example = self.extract_resource_body_example(NWFABRIC_CONFIG, method)?;
        template::populate(&example, RESOURCE_ID_PATH, moid)
    }
}

fn require_job_id(resource: &str, resp: ObjectResponse) -> Result<String, Error> {
    resp.object_id.ok_or_else(|| Error::Api {
        status: resp.status,
        resource: resource.to_owned(),
        message: "response carried no job id".into(),
    })
}
