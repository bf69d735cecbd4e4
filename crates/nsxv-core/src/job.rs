// ── Task framework job polling ──
//
// NSX Manager answers fabric install/uninstall requests with a job id.
// The job is polled at a fixed interval until it reports the target
// status, reports a terminal failure, or the attempt budget runs out.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use nsxv_api::NsxClient;

use crate::error::CoreError;

/// Status reported by a finished job.
pub const JOB_COMPLETED: &str = "COMPLETED";

/// Statuses after which a job will never reach its target.
const TERMINAL_FAILURES: &[&str] = &["FAILED", "CANCELED"];

/// Polling cadence for long-running jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two status reads.
    pub interval: Duration,
    /// Maximum number of status reads.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_attempts: 20,
        }
    }
}

/// Anything that can report the current status of a job.
pub trait JobStatusSource {
    fn job_status(&self, job_id: &str) -> impl Future<Output = Result<String, CoreError>> + Send;
}

impl JobStatusSource for NsxClient {
    async fn job_status(&self, job_id: &str) -> Result<String, CoreError> {
        Ok(self.job_instance(job_id).await?.status)
    }
}

/// Poll `job_id` until its status equals `target`.
///
/// Returns the number of polls it took. Fails with `JobFailed` as soon as
/// the job reports `FAILED` or `CANCELED` (unless that is the target), and
/// with `JobTimeout` after `max_attempts` reads. There is no pause after
/// the last read.
pub async fn wait_for_job_completion<S: JobStatusSource + Sync + ?Sized>(
    source: &S,
    job_id: &str,
    target: &str,
    poll: PollConfig,
) -> Result<u32, CoreError> {
    let mut last_status = None;

    for attempt in 1..=poll.max_attempts {
        let status = source.job_status(job_id).await?;
        debug!(job_id, attempt, %status, "job status");

        if status == target {
            info!(job_id, attempts = attempt, "job reached {target}");
            return Ok(attempt);
        }
        if TERMINAL_FAILURES.contains(&status.as_str()) {
            return Err(CoreError::JobFailed {
                job_id: job_id.to_owned(),
                status,
            });
        }
        last_status = Some(status);

        if attempt < poll.max_attempts {
            tokio::time::sleep(poll.interval).await;
        }
    }

    Err(CoreError::JobTimeout {
        job_id: job_id.to_owned(),
        target: target.to_owned(),
        attempts: poll.max_attempts,
        last_status,
    })
}
