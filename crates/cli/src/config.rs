//! Runtime configuration, read from the process environment.
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `DYNAMO_RAW_WEBHOOK_TABLE` | yes | Table scanned for unfetched events |
//! | `SQS_QUEUE_URL` | yes | Queue notifications are sent to |
//! | `DYNAMO_ENDPOINT_URL` | no | DynamoDB endpoint override |
//! | `SQS_ENDPOINT_URL` | no | SQS endpoint override |
//!
//! Region and credentials come from the standard AWS provider chain.

use supervisor::QueueUrl;
use thiserror::Error;

pub const TABLE_VAR: &str = "DYNAMO_RAW_WEBHOOK_TABLE";
pub const QUEUE_URL_VAR: &str = "SQS_QUEUE_URL";
pub const DYNAMO_ENDPOINT_VAR: &str = "DYNAMO_ENDPOINT_URL";
pub const SQS_ENDPOINT_VAR: &str = "SQS_ENDPOINT_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Required environment variable {name} is not set or empty")]
    Missing { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub table_name: String,
    pub queue_url: QueueUrl,
    pub dynamo_endpoint_url: Option<String>,
    pub sqs_endpoint_url: Option<String>,
}

impl SupervisorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing { name });

        let table_name = required(TABLE_VAR)?;
        let queue_url = QueueUrl::new(required(QUEUE_URL_VAR)?)
            .ok_or(ConfigError::Missing { name: QUEUE_URL_VAR })?;

        Ok(Self {
            table_name,
            queue_url,
            dynamo_endpoint_url: get(DYNAMO_ENDPOINT_VAR),
            sqs_endpoint_url: get(SQS_ENDPOINT_VAR),
        })
    }
}
