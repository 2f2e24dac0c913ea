//! Port traits implemented by infrastructure crates.
//!
//! The supervisor depends only on these traits. Production wiring injects the
//! DynamoDB and SQS adapters; tests inject in-memory fakes.

use async_trait::async_trait;

use crate::{EventRecord, MessageId, QueueError, QueueUrl, StoreError};

/// One page of a filtered store scan.
#[derive(Debug, Clone)]
pub struct ScanPage<C> {
    /// Records on this page, in store order.
    pub records: Vec<EventRecord>,

    /// Continuation token. `None` means this was the last page.
    pub next: Option<C>,
}

/// Read side of the durable event table.
///
/// Implementations return only records whose fetched flag is unset. The
/// supervisor never flips that flag; marking records as fetched belongs to
/// the external collaborator that consumes the notifications.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Opaque continuation token handed back on the next call.
    type Cursor: Send + Sync + std::fmt::Debug;

    /// Fetches one page of unfetched records, starting after `cursor` when given.
    async fn scan_unfetched(
        &self,
        cursor: Option<Self::Cursor>,
    ) -> Result<ScanPage<Self::Cursor>, StoreError>;
}

/// Write side of the outbound message queue.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Submits one message and returns the id the queue assigned to it.
    async fn send(&self, queue: &QueueUrl, body: &str) -> Result<MessageId, QueueError>;
}
