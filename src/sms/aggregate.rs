//! Conversation and thread aggregation.
//!
//! Every load is a full recomputation: gate on permission, fetch the inbox,
//! then fetch sent items, then merge. Calls are awaited one after another.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::model::{ConversationSummary, MessageDirection, SmsMessage};
use crate::backend::MessagingBackend;
use crate::error::{Mailbox, MessagingError};

/// Reduce inbound and outbound messages to one summary per address,
/// most recent first.
///
/// Messages without an address are dropped. Among equal timestamps the
/// first one in `inbound ++ outbound` order wins.
pub fn summarize_conversations(
    inbound: Vec<SmsMessage>,
    outbound: Vec<SmsMessage>,
) -> Vec<ConversationSummary> {
    let mut all = inbound;
    all.extend(outbound);
    // Stable; `None` sorts below any timestamp.
    all.sort_by(|a, b| b.date.cmp(&a.date));

    let mut seen = HashSet::new();
    let mut summaries = Vec::new();
    for message in all {
        let Some(address) = message.address().map(str::to_string) else {
            continue;
        };
        if !seen.insert(address.clone()) {
            continue;
        }
        summaries.push(ConversationSummary {
            address,
            latest_body: message.body,
            latest_timestamp: message.date,
        });
    }
    summaries
}

/// Merge one address's messages into a time-ascending thread.
///
/// Outbound messages are marked [`MessageDirection::Sent`] whatever the
/// provider reported. A missing timestamp sorts as zero.
pub fn merge_thread(inbound: Vec<SmsMessage>, outbound: Vec<SmsMessage>) -> Vec<SmsMessage> {
    let mut thread = inbound;
    thread.extend(outbound.into_iter().map(|mut message| {
        message.direction = Some(MessageDirection::Sent);
        message
    }));
    thread.sort_by_key(|m| m.date.unwrap_or(0));
    thread
}

/// Fail with `PermissionDenied` unless the backend grants SMS access.
pub async fn ensure_permission<B>(backend: &B) -> Result<(), MessagingError>
where
    B: MessagingBackend + ?Sized,
{
    let status = backend.request_permission().await;
    if status.is_granted() {
        Ok(())
    } else {
        warn!(status = ?status, "SMS permission not granted");
        Err(MessagingError::PermissionDenied)
    }
}

async fn fetch_both<B>(
    backend: &B,
    filter: Option<&str>,
) -> Result<(Vec<SmsMessage>, Vec<SmsMessage>), MessagingError>
where
    B: MessagingBackend + ?Sized,
{
    let inbound = backend
        .fetch_inbox(filter)
        .await
        .map_err(|e| fetch_failed(Mailbox::Inbox, e))?;
    let outbound = backend
        .fetch_sent(filter)
        .await
        .map_err(|e| fetch_failed(Mailbox::Sent, e))?;
    Ok((inbound, outbound))
}

fn fetch_failed(mailbox: Mailbox, err: MessagingError) -> MessagingError {
    match err {
        // Already labeled by a wrapping backend.
        MessagingError::FetchFailed { .. } | MessagingError::PermissionDenied => err,
        MessagingError::Unavailable(reason) => MessagingError::FetchFailed { mailbox, reason },
        other => MessagingError::FetchFailed {
            mailbox,
            reason: other.to_string(),
        },
    }
}

/// Load the conversation list from the device.
pub async fn load_conversations<B>(backend: &B) -> Result<Vec<ConversationSummary>, MessagingError>
where
    B: MessagingBackend + ?Sized,
{
    ensure_permission(backend).await?;
    let (inbound, outbound) = fetch_both(backend, None).await?;
    debug!(
        inbound = inbound.len(),
        outbound = outbound.len(),
        "Fetched messages for conversation list"
    );

    let summaries = summarize_conversations(inbound, outbound);
    info!(conversations = summaries.len(), "Conversation list loaded");
    Ok(summaries)
}

/// Load the message thread for one address.
pub async fn load_thread<B>(backend: &B, address: &str) -> Result<Vec<SmsMessage>, MessagingError>
where
    B: MessagingBackend + ?Sized,
{
    ensure_permission(backend).await?;
    let (inbound, outbound) = fetch_both(backend, Some(address)).await?;

    let thread = merge_thread(inbound, outbound);
    info!(address = %address, messages = thread.len(), "Thread loaded");
    Ok(thread)
}

/// Send a message after checking permission and validating the draft.
pub async fn send_message<B>(backend: &B, to: &str, body: &str) -> Result<(), MessagingError>
where
    B: MessagingBackend + ?Sized,
{
    let to = to.trim();
    if to.is_empty() {
        return Err(MessagingError::InvalidRecipient);
    }
    if body.trim().is_empty() {
        return Err(MessagingError::EmptyBody);
    }
    ensure_permission(backend).await?;

    backend.send(to, body).await.map_err(|e| match e {
        MessagingError::Unavailable(reason) => MessagingError::SendFailed {
            to: to.to_string(),
            reason,
        },
        MessagingError::SendFailed { .. } | MessagingError::PermissionDenied => e,
        other => MessagingError::SendFailed {
            to: to.to_string(),
            reason: other.to_string(),
        },
    })?;
    info!(to = %to, "Message sent");
    Ok(())
}
