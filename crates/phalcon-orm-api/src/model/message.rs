//! Messages produced by models when a save or delete is refused.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The kind of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// A virtual foreign key was broken.
    ConstraintViolation,
    /// A non-nullable column has no value.
    PresenceOf,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::ConstraintViolation => "ConstraintViolation",
            MessageType::PresenceOf => "PresenceOf",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message attached to a record after a failed operation.
///
/// Messages are plain values: two messages are equal when all their fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    kind: MessageType,
    message: String,
    field: String,
    code: i64,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl Message {
    /// Creates a new message with code `0` and no metadata.
    pub fn new(kind: MessageType, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: field.into(),
            code: 0,
            metadata: BTreeMap::new(),
        }
    }

    /// Creates a [`MessageType::ConstraintViolation`] message.
    pub fn constraint_violation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(MessageType::ConstraintViolation, message, field)
    }

    /// Sets the message code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Sets the message metadata.
    pub fn with_metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
