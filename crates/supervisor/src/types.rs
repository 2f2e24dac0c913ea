//! Shared value types for the supervisor domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! structure: a raw [`EventRecord`] as read from the store, the [`GroupKey`]
//! records are clustered by, and the [`CanonicalNotification`] sent downstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ArchiveId, ObjectId, OwnerId, SerializationError};

// ---------------------------------------------------------------------------
// Aspect type
// ---------------------------------------------------------------------------

/// The kind of change a webhook event reports.
///
/// Unknown kinds are kept verbatim so they pass through to the consumer
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AspectType {
    Create,
    Update,
    /// Takes precedence over every other kind within a group.
    Delete,
    Other(String),
}

impl AspectType {
    /// Parses a raw aspect string. Never fails; unknown values become [`AspectType::Other`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl From<String> for AspectType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<AspectType> for String {
    fn from(aspect: AspectType) -> Self {
        aspect.as_str().to_string()
    }
}

impl std::fmt::Display for AspectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records and keys
// ---------------------------------------------------------------------------

/// One raw webhook event as read from the store.
///
/// The supervisor never mutates records. `archive_id` is optional here because
/// only the record chosen to represent a group needs one; see
/// [`crate::aggregator::collapse_group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Entity the event is about.
    pub object_id: ObjectId,

    /// Account that owns the entity.
    pub owner_id: OwnerId,

    /// Kind of change reported.
    pub aspect_type: AspectType,

    /// Retrieval handle for the full event detail, if the record carries one.
    pub archive_id: Option<ArchiveId>,
}

impl EventRecord {
    /// Creates a record without an archive id.
    pub fn new(object_id: ObjectId, owner_id: OwnerId, aspect_type: AspectType) -> Self {
        Self {
            object_id,
            owner_id,
            aspect_type,
            archive_id: None,
        }
    }

    /// Attaches an archive id.
    #[must_use]
    pub fn with_archive_id(mut self, archive_id: ArchiveId) -> Self {
        self.archive_id = Some(archive_id);
        self
    }

    /// Returns the key this record is grouped under.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            object_id: self.object_id,
            owner_id: self.owner_id,
        }
    }
}

// ---------------------------------------------------------------------------

/// All events about the same entity for the same owner share one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub object_id: ObjectId,
    pub owner_id: OwnerId,
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.object_id, self.owner_id)
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// The single message produced for one group in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalNotification {
    pub owner_id: OwnerId,
    pub object_id: ObjectId,
    pub archive_id: ArchiveId,
    pub aspect_type: AspectType,
}

/// Message body as the downstream consumer expects it: ids are decimal strings.
#[derive(Serialize)]
struct MessageBody<'a> {
    owner_id: String,
    object_id: String,
    archive_id: &'a str,
    aspect_type: &'a str,
}

impl CanonicalNotification {
    /// Returns the key of the group this notification was collapsed from.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            object_id: self.object_id,
            owner_id: self.owner_id,
        }
    }

    /// Serialises the notification into the JSON queue message body.
    pub fn to_message_body(&self) -> Result<String, SerializationError> {
        let body = MessageBody {
            owner_id: self.owner_id.to_string(),
            object_id: self.object_id.to_string(),
            archive_id: self.archive_id.as_str(),
            aspect_type: self.aspect_type.as_str(),
        };
        Ok(serde_json::to_string(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Process-level result
// ---------------------------------------------------------------------------

/// HTTP-shaped result of one run, for compatibility with function-style invokers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub status_code: u16,
    pub body: String,
}

impl JobResponse {
    pub const SUCCESS_BODY: &'static str = "Process completed successfully";
    pub const FAILURE_BODY: &'static str = "Internal Server Error";

    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: Self::SUCCESS_BODY.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            status_code: 500,
            body: Self::FAILURE_BODY.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
