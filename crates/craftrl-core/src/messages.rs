//! Scrollback message log shown to the player.

use serde::{Deserialize, Serialize};

/// Append-only list of player-facing messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    /// Continue the newest message (starts a new one if the log is empty)
    pub fn append(&mut self, text: &str) {
        match self.messages.last_mut() {
            Some(last) => last.push_str(text),
            None => self.messages.push(text.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message `index` counting back from the newest (0 = newest)
    pub fn get(&self, index: usize) -> Option<&str> {
        if index >= self.messages.len() {
            return None;
        }
        self.messages
            .get(self.messages.len() - index - 1)
            .map(String::as_str)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Capitalise the first ASCII letter
pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
