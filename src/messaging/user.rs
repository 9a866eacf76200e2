//! Chat Participant Data Structure
//!
//! Identifies a user of the marketplace chat: the signed-in account, the
//! active conversation partner, or an entry in the online roster.

use serde::{Deserialize, Serialize};

/// A chat participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatUser {
    /// Unique user ID as issued by the auth layer
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Account email, when known
    pub email: Option<String>,
}

impl ChatUser {
    /// Create a participant record.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
        }
    }

    /// Set the account email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display name or ID fallback for roster rows.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}
