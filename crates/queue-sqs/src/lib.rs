//! Event supervisor SQS queue adapter.
//!
//! Implements [`supervisor::NotificationQueue`] with one `SendMessage` call per
//! notification. No batching, no retries beyond what the SDK's own retry
//! layer does for the single request.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Client construction and SDK error flattening live here.
//! The [`supervisor`] crate sees only [`supervisor::NotificationQueue`].

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::Client;
use supervisor::{MessageId, NotificationQueue, QueueError, QueueUrl};
use tracing::debug;

/// [`NotificationQueue`] backed by Amazon SQS.
#[derive(Debug, Clone)]
pub struct SqsNotificationQueue {
    client: Client,
}

impl SqsNotificationQueue {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the shared AWS config, optionally pointed at a
    /// non-default endpoint (e.g. localstack).
    pub fn from_shared_config(shared: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_sqs::config::Builder::from(shared);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl NotificationQueue for SqsNotificationQueue {
    async fn send(&self, queue: &QueueUrl, body: &str) -> Result<MessageId, QueueError> {
        let output = self
            .client
            .send_message()
            .queue_url(queue.as_str())
            .message_body(body)
            .send()
            .await
            .map_err(|e| QueueError::Backend {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let message_id = output
            .message_id()
            .and_then(MessageId::new)
            .ok_or(QueueError::MissingMessageId)?;

        debug!(queue = %queue, %message_id, bytes = body.len(), "SQS accepted message");
        Ok(message_id)
    }
}
