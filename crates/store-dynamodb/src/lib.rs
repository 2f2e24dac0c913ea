//! Event supervisor DynamoDB store adapter.
//!
//! Implements [`supervisor::EventStore`] as a filtered `Scan` over the raw
//! webhook table. Each call fetches one page; the `LastEvaluatedKey` of the
//! response is handed back as the continuation cursor.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request building, attribute decoding, and SDK error
//! flattening live here. The [`supervisor`] crate sees only
//! [`supervisor::EventStore`] and [`supervisor::EventRecord`].
//!
//! The adapter is read-only. Flipping the `fetched` attribute is done by the
//! consumer of the notifications, not by this crate.

pub mod decode;

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use supervisor::{EventStore, ScanPage, StoreError};
use tracing::debug;

pub use decode::{decode_record, Item};

/// Filter selecting records that have not been handed off yet.
const UNFETCHED_FILTER: &str = "#fetched = :value";

/// [`EventStore`] over one DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoEventStore {
    client: Client,
    table_name: String,
}

impl DynamoEventStore {
    /// Wraps an existing client.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Builds a client from the shared AWS config, optionally pointed at a
    /// non-default endpoint (e.g. DynamoDB Local).
    pub fn from_shared_config(
        shared: &aws_config::SdkConfig,
        table_name: impl Into<String>,
        endpoint_url: Option<&str>,
    ) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(shared);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Self::new(Client::from_conf(builder.build()), table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl EventStore for DynamoEventStore {
    type Cursor = HashMap<String, AttributeValue>;

    async fn scan_unfetched(
        &self,
        cursor: Option<Self::Cursor>,
    ) -> Result<ScanPage<Self::Cursor>, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(UNFETCHED_FILTER)
            .expression_attribute_names("#fetched", decode::FETCHED)
            .expression_attribute_values(":value", AttributeValue::S("false".to_string()))
            .set_exclusive_start_key(cursor)
            .send()
            .await
            .map_err(|e| StoreError::Backend {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let records = output
            .items()
            .iter()
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            table = %self.table_name,
            scanned = output.scanned_count(),
            matched = records.len(),
            more = output.last_evaluated_key().is_some(),
            "Scanned table page"
        );

        Ok(ScanPage {
            records,
            next: output.last_evaluated_key().cloned(),
        })
    }
}
