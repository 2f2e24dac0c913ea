//! Error types for the supervisor domain.
//!
//! Port errors ([`StoreError`], [`QueueError`]) are produced by infrastructure
//! adapters. [`RecordError`] and [`AggregateError`] describe malformed input.
//! [`JobError`] is the run-level error: it records which phase failed so the
//! failure can be logged precisely before the generic 500 result is returned.

use thiserror::Error;

use crate::GroupKey;

// ---------------------------------------------------------------------------
// Record validation
// ---------------------------------------------------------------------------

/// A stored record that cannot be decoded into an [`crate::EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required attribute is absent.
    #[error("Record is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Attribute name as stored.
        attribute: String,
    },

    /// The attribute exists but has the wrong storage type.
    #[error("Attribute '{attribute}' has unexpected type, expected {expected}")]
    InvalidAttribute {
        attribute: String,
        expected: &'static str,
    },

    /// A numeric attribute does not parse as an unsigned integer.
    #[error("Attribute '{attribute}' is not a valid identifier: '{value}'")]
    InvalidNumber { attribute: String, value: String },
}

/// A group whose chosen record cannot be turned into a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Record chosen for group {key} has no archive_id")]
    MissingArchiveId { key: GroupKey },
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Errors returned by an [`crate::EventStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity, throttling, permission or service-side failure.
    #[error("Store request failed: {message}")]
    Backend { message: String },

    /// A page contained a record that could not be decoded.
    #[error("Malformed record in store page: {0}")]
    Record(#[from] RecordError),
}

/// Errors returned by a [`crate::NotificationQueue`].
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue request failed: {message}")]
    Backend { message: String },

    /// The queue accepted the request but did not return a message id.
    #[error("Queue response did not include a message id")]
    MissingMessageId,
}

/// A notification could not be serialised into a message body.
#[derive(Debug, Error)]
#[error("Failed to serialise notification: {0}")]
pub struct SerializationError(#[from] serde_json::Error);

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Why a run ended in failure.
///
/// Every variant maps to the same outward 500 response.
#[derive(Debug, Error)]
pub enum JobError {
    /// Scanning aborted; nothing was enqueued.
    #[error("Scan phase failed on page {page}: {source}")]
    Scan {
        /// 1-based index of the page whose fetch failed.
        page: usize,
        #[source]
        source: StoreError,
    },

    /// A group could not be collapsed; nothing was enqueued.
    #[error("Aggregate phase failed: {0}")]
    Aggregate(#[from] AggregateError),

    /// A send failed. Notifications sent before it are not rolled back.
    #[error("Notify phase failed for group {key} after {sent} successful sends: {source}")]
    Notify {
        key: GroupKey,
        sent: usize,
        #[source]
        source: NotifyFailure,
    },
}

/// The underlying cause of a [`JobError::Notify`].
#[derive(Debug, Error)]
pub enum NotifyFailure {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}
