//! Session context
//!
//! The authenticated identity for one user session, passed explicitly to every
//! service call rather than read from ambient shared state.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    username: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), username: None }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn user_id(&self) -> &str { &self.user_id }

    /// Name used in the order summary; falls back to a generic salutation.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Valued Customer")
    }
}
