use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One immutable chat turn.
///
/// Fields are private so a message can't be edited after it lands in the
/// transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
    timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            is_error,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, false)
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content, false)
    }

    /// A model-role entry standing in for a reply that never arrived
    pub fn model_error(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content, true)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
