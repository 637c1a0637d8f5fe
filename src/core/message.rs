//! # Chat Messages
//!
//! The message log is append-only: entries are pushed in arrival order and
//! never mutated or removed afterwards.
//!
//! ```text
//! MessageLog
//! ├── messages: Vec<Message>   // insertion order
//! └── next_seq: u64            // feeds the id, never reused
//! ```

use chrono::{DateTime, Local, Utc};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    /// Anything the remote end sends back.
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One entry in the chat log.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Local `HH:MM` label shown under the message body.
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Ordered, append-only log of chat messages for one session.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_seq: u64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message stamped with the current time and returns it.
    pub fn append(&mut self, sender: Sender, text: String) -> &Message {
        self.append_at(sender, text, Utc::now())
    }

    /// Appends a message with an explicit timestamp.
    ///
    /// The sequence number makes ids unique even when several messages share
    /// the same millisecond (a sent message and its echo usually do).
    pub fn append_at(&mut self, sender: Sender, text: String, timestamp: DateTime<Utc>) -> &Message {
        let id = format!(
            "{}-{}-{}",
            timestamp.timestamp_millis(),
            self.next_seq,
            sender.as_str()
        );
        self.next_seq += 1;
        let index = self.messages.len();
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp,
        });
        &self.messages[index]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
