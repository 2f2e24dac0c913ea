//! Core domain for the webhook event supervisor.
//!
//! The supervisor is a batch job. It scans the raw webhook table for records
//! not yet fetched, groups them by `(object_id, owner_id)`, collapses each
//! group into one [`CanonicalNotification`], and enqueues one message per
//! group for downstream processing.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed ([`EventStore`], [`NotificationQueue`]);
//! infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ObjectId`, `OwnerId`, `ArchiveId`, etc.) |
//! | [`types`] | Value types (`EventRecord`, `GroupKey`, `CanonicalNotification`, `JobResponse`) |
//! | [`errors`] | Record, port, and run-level error types |
//! | [`ports`] | Store and queue traits implemented by infrastructure crates |
//! | [`scanner`] | Paginated scan and incremental grouping |
//! | [`aggregator`] | Delete-wins group collapse |
//! | [`notifier`] | One-message-per-notification send loop |
//! | [`job`] | The full run and its 200/500 outcome |

pub mod aggregator;
pub mod errors;
pub mod identifiers;
pub mod job;
pub mod notifier;
pub mod ports;
pub mod scanner;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{
    AggregateError, JobError, NotifyFailure, QueueError, RecordError, SerializationError,
    StoreError,
};
pub use identifiers::{ArchiveId, MessageId, ObjectId, OwnerId, QueueUrl, RunId};
pub use job::{execute, run_job, JobReport};
pub use ports::{EventStore, NotificationQueue, ScanPage};
pub use scanner::{GroupedRecords, ScanOutcome};
pub use types::{AspectType, CanonicalNotification, EventRecord, GroupKey, JobResponse, Timestamp};
