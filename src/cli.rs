//! CLI session — stdin/stdout REPL over the conversation and thread screens.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::backend::MessagingBackend;
use crate::error::MessagingError;
use crate::sms::send_message;
use crate::views::{ConversationList, ThreadView};

pub const HELP: &str = "\
Commands:
  list                    show conversations, most recent first
  open <address>          show the thread with <address>
  reply <text>            reply in the open thread
  send <address> <text>   send a new message
  refresh                 reload the current screen
  help                    show this help
  quit                    exit";

/// A parsed REPL line: a command for the session, or the end of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Run(Command),
    Quit,
}

/// A command the session executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open(String),
    Reply(String),
    Send { to: String, body: String },
    Refresh,
    Help,
}

impl Input {
    /// Parse one input line. Returns a usage hint on malformed input.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "/quit" => return Ok(Self::Quit),
            "list" | "ls" => Command::List,
            "open" if !rest.is_empty() => Command::Open(rest.to_string()),
            "open" => return Err("usage: open <address>".into()),
            "reply" if !rest.is_empty() => Command::Reply(rest.to_string()),
            "reply" => return Err("usage: reply <text>".into()),
            "send" => match rest.split_once(char::is_whitespace) {
                Some((to, body)) if !body.trim().is_empty() => Command::Send {
                    to: to.to_string(),
                    body: body.trim().to_string(),
                },
                _ => return Err("usage: send <address> <text>".into()),
            },
            "refresh" | "r" => Command::Refresh,
            "help" | "?" => Command::Help,
            "" => return Err("empty command".into()),
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Self::Run(command))
    }
}

/// State of one interactive session. Each screen's state lives here, not in
/// globals.
pub struct Session {
    backend: Arc<dyn MessagingBackend>,
    conversations: ConversationList,
    thread: Option<ThreadView>,
    preview_chars: usize,
}

impl Session {
    pub fn new(backend: Arc<dyn MessagingBackend>, preview_chars: usize) -> Self {
        Self {
            conversations: ConversationList::new(Arc::clone(&backend)),
            backend,
            thread: None,
            preview_chars,
        }
    }

    /// Address of the open thread, if any.
    pub fn open_address(&self) -> Option<&str> {
        self.thread.as_ref().map(|t| t.address())
    }

    /// Run a command and render its output.
    pub async fn execute(&mut self, command: Command) -> Result<String, MessagingError> {
        match command {
            Command::List => {
                self.thread = None;
                self.render_conversations().await
            }
            Command::Open(address) => {
                // A failed open must not leave replies going to the old thread.
                self.thread = None;
                let view = ThreadView::open(Arc::clone(&self.backend), address).await?;
                let out = render_thread(&view);
                self.thread = Some(view);
                Ok(out)
            }
            Command::Reply(body) => match self.thread.as_mut() {
                Some(view) => {
                    view.reply(body).await?;
                    Ok(render_thread(view))
                }
                None => Ok("No thread open. Use 'open <address>' first.".to_string()),
            },
            Command::Send { to, body } => {
                send_message(self.backend.as_ref(), &to, &body).await?;
                Ok(format!("Sent to {}", to.trim()))
            }
            Command::Refresh => match self.thread.as_mut() {
                Some(view) => {
                    view.refresh().await?;
                    Ok(render_thread(view))
                }
                None => self.render_conversations().await,
            },
            Command::Help => Ok(HELP.to_string()),
        }
    }

    async fn render_conversations(&mut self) -> Result<String, MessagingError> {
        let conversations = self.conversations.refresh().await?;
        if conversations.is_empty() {
            return Ok("No conversations.".to_string());
        }

        let mut out = String::new();
        for summary in conversations {
            let _ = writeln!(
                out,
                "{:<16} {:>16}  {}",
                summary.address,
                format_time(summary.latest_at()),
                summary.preview(self.preview_chars)
            );
        }
        Ok(out.trim_end().to_string())
    }
}

fn render_thread(view: &ThreadView) -> String {
    let mut out = format!("── {} ──", view.address());
    if view.messages().is_empty() {
        out.push_str("\n(no messages yet)");
    }
    if let Some(e) = view.last_error() {
        let _ = write!(out, "\n(reload failed: {e})");
    }
    for message in view.messages() {
        let marker = if message.is_sent() { ">" } else { "<" };
        let _ = write!(
            out,
            "\n{} {:>16}  {}",
            marker,
            format_time(message.timestamp()),
            message.body.as_deref().unwrap_or_default()
        );
    }
    out
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
