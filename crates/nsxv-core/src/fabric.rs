// ── Network fabric operations ──
//
// Cluster preparation (install/uninstall of the network virtualization
// VIBs) and the read-only status queries for clusters and hosts.
//
// A cluster is either Unprepared or Prepared. Install moves it through
// Preparing to Prepared, uninstall back again. Both first read the current
// state and do nothing when the cluster is already where it should be.

use std::future::Future;

use strum::Display;
use tracing::{debug, info};

use nsxv_api::NsxClient;
use nsxv_api::nsx::models::HOST_PREP_FEATURE;
use nsxv_api::nsx::{HostConnStatus, NwFabricFeatureStatus};

use crate::error::CoreError;
use crate::job::{JOB_COMPLETED, JobStatusSource, PollConfig, wait_for_job_completion};
use crate::moid::Moid;

/// Host preparation status of a prepared cluster.
const PREPARED_STATUS: &str = "GREEN";

// ── FabricApi ───────────────────────────────────────────────────────

/// The NSX Manager calls fabric operations are built from.
pub trait FabricApi: JobStatusSource + Sync {
    fn nwfabric_status(
        &self,
        moid: &Moid,
    ) -> impl Future<Output = Result<Vec<NwFabricFeatureStatus>, CoreError>> + Send;

    /// Submit an install request; returns the job id.
    fn configure_nwfabric(&self, moid: &Moid)
    -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Submit an uninstall request; returns the job id.
    fn unconfigure_nwfabric(
        &self,
        moid: &Moid,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn host_connection_status(
        &self,
        moid: &Moid,
    ) -> impl Future<Output = Result<HostConnStatus, CoreError>> + Send;
}

impl FabricApi for NsxClient {
    async fn nwfabric_status(&self, moid: &Moid) -> Result<Vec<NwFabricFeatureStatus>, CoreError> {
        Ok(NsxClient::nwfabric_status(self, moid.as_str()).await?)
    }

    async fn configure_nwfabric(&self, moid: &Moid) -> Result<String, CoreError> {
        Ok(NsxClient::configure_nwfabric(self, moid.as_str()).await?)
    }

    async fn unconfigure_nwfabric(&self, moid: &Moid) -> Result<String, CoreError> {
        Ok(NsxClient::unconfigure_nwfabric(self, moid.as_str()).await?)
    }

    async fn host_connection_status(&self, moid: &Moid) -> Result<HostConnStatus, CoreError> {
        Ok(NsxClient::host_connection_status(self, moid.as_str()).await?)
    }
}

// ── Operations and transitions ──────────────────────────────────────

/// A state-changing fabric operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FabricOperation {
    Install,
    Uninstall,
}

impl FabricOperation {
    /// Progress verb: `preparing` / `unpreparing`.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Install => "preparing",
            Self::Uninstall => "unpreparing",
        }
    }

    /// The state the operation leads to: `prepared` / `unprepared`.
    pub fn target_state(self) -> &'static str {
        match self {
            Self::Install => "prepared",
            Self::Uninstall => "unprepared",
        }
    }

    fn is_satisfied(self, prepared: bool) -> bool {
        match self {
            Self::Install => prepared,
            Self::Uninstall => !prepared,
        }
    }
}

/// Outcome of the first half of a fabric operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do; no request was sent.
    AlreadyInState,
    /// The request was accepted and is tracked by `job_id`.
    Submitted { job_id: String },
}

/// Progress callbacks for a full install/uninstall.
pub trait FabricObserver {
    fn already_in_state(&self, _operation: FabricOperation, _moid: &Moid) {}
    fn submitted(&self, _operation: FabricOperation, _moid: &Moid, _job_id: &str) {}
    fn completed(&self, _operation: FabricOperation, _moid: &Moid) {}
}

impl FabricObserver for () {}

// ── Queries ─────────────────────────────────────────────────────────

/// All fabric feature rows for a cluster.
pub async fn show_nwfabric_status<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
) -> Result<Vec<NwFabricFeatureStatus>, CoreError> {
    api.nwfabric_status(moid).await
}

/// Whether host preparation is installed and healthy on a cluster.
///
/// A cluster without a host preparation feature row is not prepared.
pub async fn is_cluster_prepared<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
) -> Result<bool, CoreError> {
    let features = api.nwfabric_status(moid).await?;
    let prepared = features
        .iter()
        .find(|f| f.feature_id == HOST_PREP_FEATURE)
        .and_then(|f| f.status.as_deref())
        == Some(PREPARED_STATUS);
    debug!(%moid, prepared, "host preparation state");
    Ok(prepared)
}

/// Communication status between NSX Manager and a host.
pub async fn communication_status<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
) -> Result<HostConnStatus, CoreError> {
    api.host_connection_status(moid).await
}

// ── State changes ───────────────────────────────────────────────────

async fn begin<A: FabricApi + ?Sized>(
    api: &A,
    operation: FabricOperation,
    moid: &Moid,
) -> Result<Transition, CoreError> {
    let prepared = is_cluster_prepared(api, moid).await?;
    if operation.is_satisfied(prepared) {
        info!(%moid, %operation, "cluster already {}", operation.target_state());
        return Ok(Transition::AlreadyInState);
    }

    let job_id = match operation {
        FabricOperation::Install => api.configure_nwfabric(moid).await?,
        FabricOperation::Uninstall => api.unconfigure_nwfabric(moid).await?,
    };
    info!(%moid, %operation, %job_id, "fabric job submitted");
    Ok(Transition::Submitted { job_id })
}

/// Submit an install unless the cluster is already prepared.
pub async fn begin_install<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
) -> Result<Transition, CoreError> {
    begin(api, FabricOperation::Install, moid).await
}

/// Submit an uninstall unless the cluster is already unprepared.
pub async fn begin_uninstall<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
) -> Result<Transition, CoreError> {
    begin(api, FabricOperation::Uninstall, moid).await
}

async fn run<A: FabricApi + ?Sized>(
    api: &A,
    operation: FabricOperation,
    moid: &Moid,
    poll: PollConfig,
    observer: &(dyn FabricObserver + Sync),
) -> Result<Transition, CoreError> {
    let transition = begin(api, operation, moid).await?;
    match &transition {
        Transition::AlreadyInState => observer.already_in_state(operation, moid),
        Transition::Submitted { job_id } => {
            observer.submitted(operation, moid, job_id);
            wait_for_job_completion(api, job_id, JOB_COMPLETED, poll).await?;
            observer.completed(operation, moid);
        }
    }
    Ok(transition)
}

/// Prepare a cluster and wait for the job to complete.
pub async fn install_network_virtualization<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
    poll: PollConfig,
    observer: &(dyn FabricObserver + Sync),
) -> Result<Transition, CoreError> {
    run(api, FabricOperation::Install, moid, poll, observer).await
}

/// Unprepare a cluster and wait for the job to complete.
pub async fn uninstall_network_virtualization<A: FabricApi + ?Sized>(
    api: &A,
    moid: &Moid,
    poll: PollConfig,
    observer: &(dyn FabricObserver + Sync),
) -> Result<Transition, CoreError> {
    run(api, FabricOperation::Uninstall, moid, poll, observer).await
}
