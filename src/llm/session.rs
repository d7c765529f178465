//! Conversation session for the Gemini chat API
//!
//! `generateContent` is stateless, so the session keeps the accumulated turns
//! and replays them with every request, together with the system instruction.

use serde::{Deserialize, Serialize};

/// Role of a turn as the Gemini API names it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// One entry of the session history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// The single long-lived conversation bound to a fixed system instruction
#[derive(Clone, Debug)]
pub struct ChatSession {
    system_instruction: String,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Completed turns, oldest first
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// History followed by a pending user turn, in request order
    pub fn pending_turns(&self, user_text: &str) -> Vec<ChatTurn> {
        let mut turns = self.history.clone();
        turns.push(ChatTurn::user(user_text));
        turns
    }

    /// Commit a finished exchange. Only called after the model answered, so a
    /// failed request leaves the history as it was.
    pub fn record_exchange(&mut self, user_text: impl Into<String>, reply: impl Into<String>) {
        self.history.push(ChatTurn::user(user_text));
        self.history.push(ChatTurn::model(reply));
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = ChatSession::new("You are Habu.");
        assert_eq!(session.system_instruction(), "You are Habu.");
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn test_pending_turns_does_not_mutate() {
        let session = ChatSession::new("sys");
        let turns = session.pending_turns("Namaste");

        assert_eq!(turns, vec![ChatTurn::user("Namaste")]);
        assert_eq!(session.turn_count(), 0);
    }

    #[test]
    fn test_record_exchange_appends_in_order() {
        let mut session = ChatSession::new("sys");
        session.record_exchange("Namaste", "Namaste! Kaise hain?");
        session.record_exchange("Theek hoon", "Bahut badhiya!");

        let roles: Vec<TurnRole> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            [TurnRole::User, TurnRole::Model, TurnRole::User, TurnRole::Model]
        );

        let turns = session.pending_turns("Aur batao");
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[4], ChatTurn::user("Aur batao"));
    }

    #[test]
    fn test_role_names() {
        assert_eq!(TurnRole::User.as_str(), "user");
        assert_eq!(TurnRole::Model.as_str(), "model");
    }
}
