//! Notifier: sends each canonical notification as one queue message.

use tracing::{debug, info};

use crate::{CanonicalNotification, JobError, MessageId, NotificationQueue, NotifyFailure, QueueUrl};

/// Sends `notifications` one at a time, in order.
///
/// The first failure stops the loop. Messages already sent stay sent, and the
/// error reports how many there were.
pub async fn notify_all<Q>(
    queue: &Q,
    queue_url: &QueueUrl,
    notifications: &[CanonicalNotification],
) -> Result<Vec<MessageId>, JobError>
where
    Q: NotificationQueue + ?Sized,
{
    let mut sent = Vec::with_capacity(notifications.len());

    for notification in notifications {
        let key = notification.group_key();
        let message_id = send_one(queue, queue_url, notification)
            .await
            .map_err(|source| JobError::Notify {
                key,
                sent: sent.len(),
                source,
            })?;

        info!(
            %key,
            aspect_type = %notification.aspect_type,
            %message_id,
            "Notification sent"
        );
        sent.push(message_id);
    }

    Ok(sent)
}

async fn send_one<Q>(
    queue: &Q,
    queue_url: &QueueUrl,
    notification: &CanonicalNotification,
) -> Result<MessageId, NotifyFailure>
where
    Q: NotificationQueue + ?Sized,
{
    let body = notification.to_message_body()?;
    debug!(key = %notification.group_key(), %body, "Sending notification");
    Ok(queue.send(queue_url, &body).await?)
}
