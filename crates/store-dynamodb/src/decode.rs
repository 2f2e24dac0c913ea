//! Attribute-map decoding for raw webhook items.
//!
//! Item layout (as written by the webhook intake):
//!
//! | Attribute | Type | Required |
//! |-----------|------|----------|
//! | `object_id` | `N` | yes |
//! | `owner_id` | `N` | yes |
//! | `aspect_type` | `S` | yes |
//! | `archive_id` | `S` | no |
//! | `fetched` | `S` (`"true"` / `"false"`) | filter only |

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use supervisor::{ArchiveId, AspectType, EventRecord, ObjectId, OwnerId, RecordError};

/// A raw DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

pub const OBJECT_ID: &str = "object_id";
pub const OWNER_ID: &str = "owner_id";
pub const ASPECT_TYPE: &str = "aspect_type";
pub const ARCHIVE_ID: &str = "archive_id";
pub const FETCHED: &str = "fetched";

/// Decodes one item into an [`EventRecord`].
pub fn decode_record(item: &Item) -> Result<EventRecord, RecordError> {
    let object_id = ObjectId::new(number(item, OBJECT_ID)?);
    let owner_id = OwnerId::new(number(item, OWNER_ID)?);
    let aspect_type = AspectType::parse(string(item, ASPECT_TYPE)?);

    let record = EventRecord::new(object_id, owner_id, aspect_type);
    Ok(match optional_string(item, ARCHIVE_ID)?.map(ArchiveId::from_stored) {
        Some(archive_id) => record.with_archive_id(archive_id),
        None => record,
    })
}

fn attribute<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue, RecordError> {
    item.get(name).ok_or_else(|| RecordError::MissingAttribute {
        attribute: name.to_string(),
    })
}

fn number(item: &Item, name: &str) -> Result<u64, RecordError> {
    let raw = attribute(item, name)?
        .as_n()
        .map_err(|_| RecordError::InvalidAttribute {
            attribute: name.to_string(),
            expected: "N",
        })?;

    raw.trim().parse().map_err(|_| RecordError::InvalidNumber {
        attribute: name.to_string(),
        value: raw.clone(),
    })
}

fn string<'a>(item: &'a Item, name: &str) -> Result<&'a str, RecordError> {
    attribute(item, name)?
        .as_s()
        .map(String::as_str)
        .map_err(|_| RecordError::InvalidAttribute {
            attribute: name.to_string(),
            expected: "S",
        })
}

fn optional_string<'a>(item: &'a Item, name: &str) -> Result<Option<&'a str>, RecordError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(_) => string(item, name).map(Some),
    }
}
