//! Credential verification.
//!
//! There is no backend-verified login: the gate compares against a single
//! fixed pair. The check sits behind [`AuthenticationProvider`] so a real
//! provider can replace it without touching the session logic.

pub trait AuthenticationProvider {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Compares against one literal username/password pair. Not secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn into_parts(self) -> (String, String) {
        (self.username, self.password)
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new("ameen", "ameen@123")
    }
}

impl AuthenticationProvider for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
