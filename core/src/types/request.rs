//! Request types for chat calls

use crate::types::message::Message;
use crate::types::settings::ModelSettings;

/// A single chat call: the conversation so far plus the settings to run it with
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The conversation turns, oldest first
    pub messages: Vec<Message>,
    /// Settings resolved by the caller (usually a registry snapshot)
    pub settings: ModelSettings,
}

impl ChatRequest {
    /// Create a request from messages and settings
    pub fn new(messages: Vec<Message>, settings: ModelSettings) -> Self {
        Self { messages, settings }
    }

    /// Create a new request builder
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Builder for [`ChatRequest`]
#[derive(Debug, Default)]
pub struct ChatRequestBuilder {
    messages: Vec<Message>,
    settings: ModelSettings,
}

impl ChatRequestBuilder {
    /// Add a message
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Add a system message
    pub fn system(self, content: impl Into<String>) -> Self {
        self.message(Message::system(content))
    }

    /// Add a user message
    pub fn user(self, content: impl Into<String>) -> Self {
        self.message(Message::user(content))
    }

    /// Add an assistant message
    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.message(Message::assistant(content))
    }

    /// Set the settings
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the model, keeping the other settings
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    /// Build the request
    pub fn build(self) -> ChatRequest {
        ChatRequest {
            messages: self.messages,
            settings: self.settings,
        }
    }
}
