use serde::{Deserialize, Serialize};

/// Top-level view containers; exactly one is visible at a time
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Home,
    Messages,
}

/// Whether the panel is currently shown to the user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Severity of a message shown in the message view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Info,
    Error,
}

impl MessageKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Error => "Error",
        }
    }
}

/// Content of the message view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePanel {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

impl MessagePanel {
    pub fn new(kind: MessageKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            body: body.into(),
        }
    }

    pub fn info(body: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, body)
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, body)
    }
}
