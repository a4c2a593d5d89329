//! Per-screen state: conversation list, open thread, message composer.

pub mod composer;
pub mod conversations;
pub mod thread;

pub use composer::Composer;
pub use conversations::ConversationList;
pub use thread::ThreadView;
