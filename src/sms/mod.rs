//! SMS messages, conversation summaries and their aggregation.

pub mod aggregate;
pub mod model;

pub use aggregate::{
    ensure_permission, load_conversations, load_thread, merge_thread, send_message,
    summarize_conversations,
};
pub use model::{ConversationSummary, MessageDirection, SmsMessage};
