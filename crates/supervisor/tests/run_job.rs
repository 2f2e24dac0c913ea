//! End-to-end runs against in-memory store and queue fakes.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use supervisor::{
    execute, run_job, scanner, ArchiveId, AspectType, EventRecord, EventStore, JobError,
    MessageId, NotificationQueue, ObjectId, OwnerId, QueueError, QueueUrl, RecordError, RunId,
    ScanPage, StoreError,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Serves a fixed list of pages; the cursor is the next page index.
struct PagedStore {
    pages: Vec<Vec<EventRecord>>,
    /// 1-based page number whose fetch fails with a backend error.
    fail_on_page: Option<usize>,
    /// 1-based page number carrying an undecodable record.
    malformed_page: Option<usize>,
    cursors: Mutex<Vec<Option<usize>>>,
}

impl PagedStore {
    fn new(pages: Vec<Vec<EventRecord>>) -> Self {
        Self {
            pages,
            fail_on_page: None,
            malformed_page: None,
            cursors: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    fn malformed_on(mut self, page: usize) -> Self {
        self.malformed_page = Some(page);
        self
    }
}

#[async_trait]
impl EventStore for PagedStore {
    type Cursor = usize;

    async fn scan_unfetched(&self, cursor: Option<usize>) -> Result<ScanPage<usize>, StoreError> {
        self.cursors.lock().unwrap().push(cursor);
        let index = cursor.unwrap_or(0);

        if self.fail_on_page == Some(index + 1) {
            return Err(StoreError::Backend {
                message: "ProvisionedThroughputExceededException".to_string(),
            });
        }

        if self.malformed_page == Some(index + 1) {
            return Err(StoreError::Record(RecordError::MissingAttribute {
                attribute: "owner_id".to_string(),
            }));
        }

        let records = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then_some(index + 1);
        Ok(ScanPage { records, next })
    }
}

/// Records every body it accepts; optionally fails the n-th send attempt.
#[derive(Default)]
struct RecordingQueue {
    /// 1-based send attempt that fails.
    fail_on_attempt: Option<usize>,
    attempts: Mutex<usize>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingQueue {
    fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::default()
        }
    }

    fn bodies(&self) -> Vec<serde_json::Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| serde_json::from_str(body).unwrap())
            .collect()
    }

    fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationQueue for RecordingQueue {
    async fn send(&self, queue: &QueueUrl, body: &str) -> Result<MessageId, QueueError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };

        if self.fail_on_attempt == Some(attempt) {
            return Err(QueueError::Backend {
                message: "connection reset".to_string(),
            });
        }

        self.sent
            .lock()
            .unwrap()
            .push((queue.to_string(), body.to_string()));
        Ok(MessageId::new(format!("msg-{attempt}")).unwrap())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record(object: u64, owner: u64, aspect: &str, archive: Option<&str>) -> EventRecord {
    let r = EventRecord::new(
        ObjectId::new(object),
        OwnerId::new(owner),
        AspectType::parse(aspect),
    );
    match archive.and_then(ArchiveId::new) {
        Some(a) => r.with_archive_id(a),
        None => r,
    }
}

fn queue_url() -> QueueUrl {
    QueueUrl::new("https://sqs.eu-west-1.amazonaws.com/000000000000/activity-jobs").unwrap()
}

/// `count` single-record groups with distinct object ids starting at `first`.
fn distinct_records(first: u64, count: u64) -> Vec<EventRecord> {
    (first..first + count)
        .map(|id| record(id, 1, "create", Some(&format!("A{id}"))))
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_and_single_create_scenarios() {
    let store = PagedStore::new(vec![vec![
        record(1, 9, "create", None),
        record(1, 9, "update", None),
        record(2, 9, "create", Some("A2")),
        record(1, 9, "delete", Some("A1")),
    ]]);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Process completed successfully");
    assert_eq!(
        queue.bodies(),
        vec![
            serde_json::json!({"owner_id":"9","object_id":"1","archive_id":"A1","aspect_type":"delete"}),
            serde_json::json!({"owner_id":"9","object_id":"2","archive_id":"A2","aspect_type":"create"}),
        ]
    );
}

#[tokio::test]
async fn messages_target_the_configured_queue() {
    let store = PagedStore::new(vec![distinct_records(1, 2)]);
    let queue = RecordingQueue::default();

    run_job(&store, &queue, &queue_url()).await;

    let sent = queue.sent.lock().unwrap();
    assert!(sent.iter().all(|(url, _)| *url == queue_url().to_string()));
}

#[tokio::test]
async fn delete_on_a_later_page_still_wins() {
    let store = PagedStore::new(vec![
        vec![record(7, 3, "create", Some("C")), record(7, 3, "update", Some("U"))],
        vec![record(7, 3, "delete", Some("D"))],
    ]);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert!(response.is_success());
    let bodies = queue.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["aspect_type"], "delete");
    assert_eq!(bodies[0]["archive_id"], "D");
}

#[tokio::test]
async fn one_send_per_distinct_key() {
    let store = PagedStore::new(vec![
        vec![
            record(1, 1, "create", Some("a")),
            record(1, 2, "create", Some("b")),
            record(2, 1, "create", Some("c")),
        ],
        vec![
            record(1, 1, "update", Some("d")),
            record(2, 1, "update", Some("e")),
            record(3, 3, "create", Some("f")),
        ],
    ]);
    let queue = RecordingQueue::default();

    let report = execute(&store, &queue, &queue_url(), RunId::new_random())
        .await
        .unwrap();

    assert_eq!(report.records, 6);
    assert_eq!(report.groups, 4);
    assert_eq!(report.message_ids.len(), 4);

    let keys: HashSet<(String, String)> = queue
        .bodies()
        .iter()
        .map(|b| {
            (
                b["object_id"].as_str().unwrap().to_string(),
                b["owner_id"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(keys.len(), 4);
}

#[tokio::test]
async fn scan_follows_continuation_tokens_across_all_pages() {
    let store = PagedStore::new(vec![
        distinct_records(0, 5),
        distinct_records(5, 5),
        distinct_records(10, 2),
    ]);

    let outcome = scanner::scan_all(&store).await.unwrap();

    assert_eq!(outcome.pages, 3);
    assert_eq!(outcome.groups.record_count(), 12);
    assert_eq!(outcome.groups.len(), 12);
    assert_eq!(*store.cursors.lock().unwrap(), vec![None, Some(1), Some(2)]);
}

#[tokio::test]
async fn scan_failure_sends_nothing() {
    let store = PagedStore::new(vec![
        distinct_records(0, 5),
        distinct_records(5, 5),
        distinct_records(10, 2),
    ])
    .failing_on(2);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "Internal Server Error");
    assert_eq!(queue.attempts(), 0);
}

#[tokio::test]
async fn scan_failure_reports_the_failing_page() {
    let store = PagedStore::new(vec![distinct_records(0, 1), distinct_records(1, 1)]).failing_on(2);
    let queue = RecordingQueue::default();

    let err = execute(&store, &queue, &queue_url(), RunId::new_random())
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Scan { page: 2, .. }));
}

#[tokio::test]
async fn send_failure_stops_remaining_sends() {
    let store = PagedStore::new(vec![distinct_records(1, 3)]);
    let queue = RecordingQueue::failing_on(2);

    let response = run_job(&store, &queue, &queue_url()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(queue.attempts(), 2);
    let bodies = queue.bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["object_id"], "1");
}

#[tokio::test]
async fn send_failure_reports_partial_progress() {
    let store = PagedStore::new(vec![distinct_records(1, 3)]);
    let queue = RecordingQueue::failing_on(2);

    let err = execute(&store, &queue, &queue_url(), RunId::new_random())
        .await
        .unwrap_err();

    match err {
        JobError::Notify { key, sent, .. } => {
            assert_eq!(sent, 1);
            assert_eq!(key.object_id, ObjectId::new(2));
        }
        other => panic!("expected notify failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_table_still_succeeds() {
    let store = PagedStore::new(vec![Vec::new()]);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert!(response.is_success());
    assert_eq!(queue.attempts(), 0);
}

#[tokio::test]
async fn missing_archive_id_fails_before_any_send() {
    let store = PagedStore::new(vec![vec![
        record(1, 1, "create", Some("A1")),
        record(2, 1, "update", None),
    ]]);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(queue.attempts(), 0);
}

#[tokio::test]
async fn malformed_record_fails_the_scan_and_sends_nothing() {
    let store = PagedStore::new(vec![distinct_records(0, 2), distinct_records(2, 2)]).malformed_on(2);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;
    assert_eq!(response.status_code, 500);
    assert_eq!(queue.attempts(), 0);

    let err = execute(&store, &queue, &queue_url(), RunId::new_random())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        JobError::Scan {
            page: 2,
            source: StoreError::Record(RecordError::MissingAttribute { .. })
        }
    ));
}

#[tokio::test]
async fn empty_stored_archive_id_is_forwarded() {
    let store = PagedStore::new(vec![vec![EventRecord::new(
        ObjectId::new(1),
        OwnerId::new(9),
        AspectType::Create,
    )
    .with_archive_id(ArchiveId::from_stored(""))]]);
    let queue = RecordingQueue::default();

    let response = run_job(&store, &queue, &queue_url()).await;

    assert!(response.is_success());
    assert_eq!(
        queue.bodies(),
        vec![serde_json::json!({"owner_id":"9","object_id":"1","archive_id":"","aspect_type":"create"})]
    );
}
