//! Integration tests for the aggregators against a scripted backend.
//!
//! The stub records every call so ordering and gating can be asserted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sms_threads::backend::{MessagingBackend, PermissionStatus};
use sms_threads::error::{Mailbox, MessagingError};
use sms_threads::sms::{
    MessageDirection, SmsMessage, load_conversations, load_thread, send_message,
};
use sms_threads::views::ConversationList;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Permission,
    Inbox(Option<String>),
    Sent(Option<String>),
    Send(String, String),
}

/// Stub device backend (no real SMS provider).
struct StubDevice {
    permission: PermissionStatus,
    inbox: Vec<SmsMessage>,
    sent: Vec<SmsMessage>,
    fail_sent: bool,
    fail_send: bool,
    calls: Mutex<Vec<Call>>,
}

impl StubDevice {
    fn new(inbox: Vec<SmsMessage>, sent: Vec<SmsMessage>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            inbox,
            sent,
            fail_sent: false,
            fail_send: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn matching(messages: &[SmsMessage], filter: Option<&str>) -> Vec<SmsMessage> {
    messages
        .iter()
        .filter(|m| filter.is_none() || m.address.as_deref() == filter)
        .cloned()
        .collect()
}

#[async_trait]
impl MessagingBackend for StubDevice {
    async fn request_permission(&self) -> PermissionStatus {
        self.record(Call::Permission);
        self.permission
    }

    async fn fetch_inbox(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError> {
        self.record(Call::Inbox(filter.map(str::to_string)));
        Ok(matching(&self.inbox, filter))
    }

    async fn fetch_sent(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError> {
        self.record(Call::Sent(filter.map(str::to_string)));
        if self.fail_sent {
            return Err(MessagingError::Unavailable("sent cursor closed".into()));
        }
        Ok(matching(&self.sent, filter))
    }

    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError> {
        self.record(Call::Send(to.to_string(), body.to_string()));
        if self.fail_send {
            return Err(MessagingError::Unavailable("radio off".into()));
        }
        Ok(())
    }
}

fn undirected(address: &str, body: &str, date: Option<i64>) -> SmsMessage {
    SmsMessage {
        address: Some(address.to_string()),
        body: Some(body.to_string()),
        date,
        direction: None,
    }
}

#[tokio::test]
async fn permission_then_inbox_then_sent() {
    let device = StubDevice::new(vec![SmsMessage::received("A", "hi", 100)], vec![]);

    load_conversations(&device).await.unwrap();
    assert_eq!(
        device.calls(),
        vec![Call::Permission, Call::Inbox(None), Call::Sent(None)]
    );
}

#[tokio::test]
async fn thread_fetches_are_filtered() {
    let device = StubDevice::new(vec![], vec![]);

    let thread = load_thread(&device, "+15550100").await.unwrap();
    assert!(thread.is_empty());
    assert_eq!(
        device.calls(),
        vec![
            Call::Permission,
            Call::Inbox(Some("+15550100".into())),
            Call::Sent(Some("+15550100".into())),
        ]
    );
}

#[tokio::test]
async fn denied_permission_fetches_nothing() {
    for status in [PermissionStatus::Denied, PermissionStatus::Undetermined] {
        let mut device = StubDevice::new(vec![SmsMessage::received("A", "hi", 100)], vec![]);
        device.permission = status;

        assert_eq!(
            load_conversations(&device).await,
            Err(MessagingError::PermissionDenied)
        );
        assert_eq!(
            load_thread(&device, "A").await,
            Err(MessagingError::PermissionDenied)
        );
        assert_eq!(
            send_message(&device, "A", "hi").await,
            Err(MessagingError::PermissionDenied)
        );
        assert_eq!(device.calls(), vec![Call::Permission; 3]);
    }
}

#[tokio::test]
async fn sent_failure_discards_inbox_results() {
    let mut device = StubDevice::new(vec![SmsMessage::received("A", "hi", 100)], vec![]);
    device.fail_sent = true;
    let device = Arc::new(device);

    let mut list = ConversationList::new(device.clone());
    let err = list.refresh().await.unwrap_err();
    assert_eq!(
        err,
        MessagingError::FetchFailed {
            mailbox: Mailbox::Sent,
            reason: "sent cursor closed".into(),
        }
    );
    assert!(list.conversations().is_empty());
}

#[tokio::test]
async fn scenario_reply_is_latest() {
    let device = StubDevice::new(
        vec![SmsMessage::received("A", "hi", 100)],
        vec![undirected("A", "yo", Some(200))],
    );

    let summaries = load_conversations(&device).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].address, "A");
    assert_eq!(summaries[0].latest_body.as_deref(), Some("yo"));
    assert_eq!(summaries[0].latest_timestamp, Some(200));
}

#[tokio::test]
async fn one_summary_per_address_with_max_timestamp() {
    // Deterministic spread of addresses and timestamps, some undated.
    let mut inbox = Vec::new();
    let mut sent = Vec::new();
    for i in 0..60i64 {
        let address = format!("+1555{:04}", i % 7);
        let date = if i % 11 == 0 { None } else { Some((i * 37) % 101) };
        let message = undirected(&address, &format!("m{i}"), date);
        if i % 3 == 0 {
            sent.push(message);
        } else {
            inbox.push(message);
        }
    }

    let mut expected: HashMap<String, Option<i64>> = HashMap::new();
    for m in inbox.iter().chain(sent.iter()) {
        let entry = expected.entry(m.address.clone().unwrap()).or_insert(None);
        *entry = (*entry).max(m.date);
    }

    let device = StubDevice::new(inbox, sent);
    let summaries = load_conversations(&device).await.unwrap();

    assert_eq!(summaries.len(), expected.len());
    for summary in &summaries {
        assert_eq!(summary.latest_timestamp, expected[&summary.address]);
    }
    assert!(
        summaries
            .windows(2)
            .all(|w| w[0].latest_timestamp >= w[1].latest_timestamp)
    );
}

#[tokio::test]
async fn thread_output_is_sorted_and_outbound_marked_sent() {
    let device = StubDevice::new(
        vec![
            SmsMessage::received("A", "in-3", 300),
            SmsMessage::received("A", "in-1", 100),
        ],
        vec![
            undirected("A", "out-2", Some(200)),
            SmsMessage::received("A", "out-3", 300),
        ],
    );

    let thread = load_thread(&device, "A").await.unwrap();
    let dates: Vec<_> = thread.iter().map(|m| m.date.unwrap()).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));

    let bodies: Vec<_> = thread.iter().map(|m| m.body.as_deref().unwrap()).collect();
    assert_eq!(bodies, vec!["in-1", "out-2", "in-3", "out-3"]);

    for message in &thread {
        let expected = if message.body.as_deref().unwrap().starts_with("out") {
            MessageDirection::Sent
        } else {
            MessageDirection::Received
        };
        assert_eq!(message.direction, Some(expected));
    }
}

#[tokio::test]
async fn send_goes_through_gate_once() {
    let device = StubDevice::new(vec![], vec![]);
    send_message(&device, "A", "hello").await.unwrap();
    assert_eq!(
        device.calls(),
        vec![Call::Permission, Call::Send("A".into(), "hello".into())]
    );
}

#[tokio::test]
async fn rejected_send_reports_trimmed_recipient() {
    let mut device = StubDevice::new(vec![], vec![]);
    device.fail_send = true;

    assert_eq!(
        send_message(&device, "  +15550100 ", "hello").await,
        Err(MessagingError::SendFailed {
            to: "+15550100".into(),
            reason: "radio off".into(),
        })
    );
    assert_eq!(
        device.calls(),
        vec![
            Call::Permission,
            Call::Send("+15550100".into(), "hello".into()),
        ]
    );
}
