//! Chat message data structure.

use serde::{Deserialize, Serialize};

/// A titled link shown at the top of a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageTitle {
    pub text: String,
    pub url: String,
}

/// A named entry rendered below the message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageField {
    pub name: String,
    pub value: String,
}

/// Rich chat message derived from a posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub description: String,
    pub color: u32,
    pub title: Option<MessageTitle>,
    pub author_name: Option<String>,
    pub author_icon: Option<String>,
    pub footer: Option<String>,
    pub fields: Vec<MessageField>,
}

impl ChatMessage {
    /// Create a message with only a body and color.
    pub fn new(description: impl Into<String>, color: u32) -> Self {
        Self {
            description: description.into(),
            color,
            title: None,
            author_name: None,
            author_icon: None,
            footer: None,
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping insertion order.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(MessageField {
            name: name.into(),
            value: value.into(),
        });
    }
}
