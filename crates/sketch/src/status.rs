use tracing::{info, warn};

/// Receiver for user-facing status text
pub trait StatusSink {
    fn status(&mut self, message: &str);

    /// A recoverable problem the user should see
    fn warning(&mut self, message: &str) {
        self.status(message);
    }
}

/// Forwards status text to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn status(&mut self, message: &str) {
        info!("{message}");
    }

    fn warning(&mut self, message: &str) {
        warn!("{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Status(String),
    Warning(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Status(text) | Self::Warning(text) => text,
        }
    }
}

/// Keeps every message, for tests and headless scripting
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    pub messages: Vec<StatusMessage>,
}

impl StatusLog {
    pub fn last(&self) -> Option<&StatusMessage> {
        self.messages.last()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            StatusMessage::Warning(text) => Some(text.as_str()),
            StatusMessage::Status(_) => None,
        })
    }
}

impl StatusSink for StatusLog {
    fn status(&mut self, message: &str) {
        self.messages.push(StatusMessage::Status(message.to_string()));
    }

    fn warning(&mut self, message: &str) {
        self.messages.push(StatusMessage::Warning(message.to_string()));
    }
}
