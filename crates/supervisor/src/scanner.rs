//! Record scanner: drains every page of unfetched records into groups.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{EventRecord, EventStore, GroupKey, JobError};

/// Records clustered by [`GroupKey`].
///
/// Groups iterate in the order their first record was seen, and each group
/// keeps its records in encounter order. The aggregator's tie-breaks depend on
/// both orderings.
#[derive(Debug, Clone, Default)]
pub struct GroupedRecords {
    groups: IndexMap<GroupKey, Vec<EventRecord>>,
}

impl GroupedRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to its group, creating the group on first sight.
    pub fn push(&mut self, record: EventRecord) {
        self.groups.entry(record.group_key()).or_default().push(record);
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Returns the records of one group, if present.
    pub fn get(&self, key: &GroupKey) -> Option<&[EventRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterates groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[EventRecord])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

impl Extend<EventRecord> for GroupedRecords {
    fn extend<I: IntoIterator<Item = EventRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<EventRecord> for GroupedRecords {
    fn from_iter<I: IntoIterator<Item = EventRecord>>(iter: I) -> Self {
        let mut grouped = Self::new();
        grouped.extend(iter);
        grouped
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub groups: GroupedRecords,
    /// Number of pages fetched.
    pub pages: usize,
}

/// Reads every page of unfetched records from `store`, grouping as pages arrive.
///
/// Stops when the store returns no continuation token. The first failed page
/// aborts the scan with [`JobError::Scan`]; nothing scanned so far is kept.
pub async fn scan_all<S>(store: &S) -> Result<ScanOutcome, JobError>
where
    S: EventStore + ?Sized,
{
    let mut groups = GroupedRecords::new();
    let mut cursor = None;
    let mut pages = 0;

    loop {
        pages += 1;
        let page = store
            .scan_unfetched(cursor.take())
            .await
            .map_err(|source| JobError::Scan { page: pages, source })?;

        debug!(page = pages, records = page.records.len(), "Fetched store page");
        for record in page.records {
            debug!(page = pages, ?record, "Scanned record");
            groups.push(record);
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    if groups.is_empty() {
        info!(pages, "Scan complete, no unfetched records");
    } else {
        info!(
            pages,
            records = groups.record_count(),
            groups = groups.len(),
            "Scan complete"
        );
    }

    Ok(ScanOutcome { groups, pages })
}
