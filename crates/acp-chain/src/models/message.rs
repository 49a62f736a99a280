use serde::{Deserialize, Serialize};

pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One ordered piece of a message; ACP allows several per message
pub struct MessagePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
}

impl MessagePart {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessagePart {
            name: None,
            content_type: TEXT_PLAIN.to_string(),
            content: Some(text.into()),
            content_url: None,
        }
    }

    /// Get the inline content, if the part carries any
    pub fn as_text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an agent
pub struct Message {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Create a new user message with no parts
    pub fn user() -> Self {
        Message {
            role: default_role(),
            parts: Vec::new(),
        }
    }

    /// Create a new message authored by the named agent
    pub fn agent(agent_name: &str) -> Self {
        Message {
            role: format!("agent/{}", agent_name),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: MessagePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a text/plain part to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_part(MessagePart::text(text))
    }

    /// The content of the first part, which is where agents put their answer
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(MessagePart::as_text)
    }
}

fn default_role() -> String {
    "user".to_string()
}

fn default_content_type() -> String {
    TEXT_PLAIN.to_string()
}
