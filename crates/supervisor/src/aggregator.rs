//! Aggregator: collapses each group of records into one notification.
//!
//! Rules, applied per group:
//!
//! 1. If any record is a `delete`, the first delete (encounter order) is used
//!    and the notification's aspect is `delete`.
//! 2. Otherwise the first record of the group is used as-is.
//!
//! Rule 2 means a `create` followed by an `update` yields `create`: the first
//! record seen wins, not the latest.

use crate::{
    AggregateError, AspectType, CanonicalNotification, EventRecord, GroupKey, GroupedRecords,
};

/// Collapses one group. Returns `Ok(None)` for an empty group.
pub fn collapse_group(
    key: GroupKey,
    records: &[EventRecord],
) -> Result<Option<CanonicalNotification>, AggregateError> {
    let delete = records.iter().find(|r| r.aspect_type.is_delete());

    let (chosen, aspect_type) = match (delete, records.first()) {
        (Some(record), _) => (record, AspectType::Delete),
        (None, Some(record)) => (record, record.aspect_type.clone()),
        (None, None) => return Ok(None),
    };

    let archive_id = chosen
        .archive_id
        .clone()
        .ok_or(AggregateError::MissingArchiveId { key })?;

    Ok(Some(CanonicalNotification {
        owner_id: chosen.owner_id,
        object_id: chosen.object_id,
        archive_id,
        aspect_type,
    }))
}

/// Collapses every group, preserving group order.
///
/// Fails on the first group that cannot be collapsed, so either every
/// notification for the run is available or none is.
pub fn aggregate(groups: &GroupedRecords) -> Result<Vec<CanonicalNotification>, AggregateError> {
    let mut notifications = Vec::with_capacity(groups.len());
    for (key, records) in groups.iter() {
        if let Some(notification) = collapse_group(*key, records)? {
            notifications.push(notification);
        }
    }
    Ok(notifications)
}
