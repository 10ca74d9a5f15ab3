//! Session context supplied by the authentication collaborator.

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user and the bearer token for backend calls.
///
/// Passed to the network adapter when it is constructed instead of being
/// read from ambient storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionContext {
    /// Id of the signed-in user; also the owner for remote exports.
    pub user_id: String,
    /// Bearer token, if the auth collaborator issued one.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl SessionContext {
    /// Creates a session without a token.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            bearer_token: None,
        }
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_token() {
        let session = SessionContext::new("u1").with_token("secret");
        let rendered = format!("{session:?}");
        assert!(rendered.contains("u1"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let session = SessionContext::new("u1").with_token("");
        assert_eq!(session.bearer_token, None);
    }
}
