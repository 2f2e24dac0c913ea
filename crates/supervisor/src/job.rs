//! The supervisor run: scan, aggregate, notify.
//!
//! Phases are strictly sequential. The scan drains every page before
//! aggregation starts, and aggregation finishes before the first send.

use tracing::{error, info, info_span, Instrument};

use crate::{
    aggregator, notifier, scanner, EventStore, JobError, JobResponse, MessageId,
    NotificationQueue, QueueUrl, RunId, Timestamp,
};

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub run_id: RunId,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    /// Store pages fetched.
    pub pages: usize,
    /// Unfetched records read.
    pub records: usize,
    /// Distinct groups found; equals the number of messages sent.
    pub groups: usize,
    /// Ids of the sent messages, in send order.
    pub message_ids: Vec<MessageId>,
}

/// Runs the job and returns its report or the error that stopped it.
pub async fn execute<S, Q>(
    store: &S,
    queue: &Q,
    queue_url: &QueueUrl,
    run_id: RunId,
) -> Result<JobReport, JobError>
where
    S: EventStore + ?Sized,
    Q: NotificationQueue + ?Sized,
{
    let started_at = Timestamp::now();

    let scan = scanner::scan_all(store).await?;
    let notifications = aggregator::aggregate(&scan.groups)?;
    let message_ids = notifier::notify_all(queue, queue_url, &notifications).await?;

    Ok(JobReport {
        run_id,
        started_at,
        finished_at: Timestamp::now(),
        pages: scan.pages,
        records: scan.groups.record_count(),
        groups: scan.groups.len(),
        message_ids,
    })
}

/// Process entry point: one full run mapped to a 200 or 500 response.
///
/// Errors are logged here, then collapsed into the generic failure body.
pub async fn run_job<S, Q>(store: &S, queue: &Q, queue_url: &QueueUrl) -> JobResponse
where
    S: EventStore + ?Sized,
    Q: NotificationQueue + ?Sized,
{
    let run_id = RunId::new_random();
    let span = info_span!("supervisor_run", %run_id);

    async move {
        match execute(store, queue, queue_url, run_id).await {
            Ok(report) => {
                info!(
                    pages = report.pages,
                    records = report.records,
                    groups = report.groups,
                    sent = report.message_ids.len(),
                    started_at = %report.started_at,
                    finished_at = %report.finished_at,
                    "Run completed"
                );
                JobResponse::success()
            }
            Err(e) => {
                if let JobError::Notify { sent, .. } = &e {
                    error!(error = %e, sent, "Run failed after partial send");
                } else {
                    error!(error = %e, "Run failed");
                }
                JobResponse::failure()
            }
        }
    }
    .instrument(span)
    .await
}
