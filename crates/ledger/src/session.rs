use serde::{Deserialize, Serialize};

use crate::{AuthenticationProvider, LedgerError, Result};

/// Persisted identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
}

/// Login gate: `Anonymous -> Authenticated -> Anonymous`.
///
/// Entering `Authenticated`, either by [`login`](Self::login) or by starting
/// from a restored identity, arms a one-shot flag that the owner consumes
/// with [`take_entered`](Self::take_entered) to trigger the initial account
/// load exactly once per transition.
pub struct SessionGate {
    identity: Option<Identity>,
    provider: Box<dyn AuthenticationProvider + Send + Sync>,
    entered: bool,
}

impl SessionGate {
    pub fn new(
        identity: Option<Identity>,
        provider: Box<dyn AuthenticationProvider + Send + Sync>,
    ) -> Self {
        let entered = identity.is_some();
        Self {
            identity,
            provider,
            entered,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<&Identity> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Please enter both username and password".to_string(),
            ));
        }
        if !self.provider.verify(username, password) {
            tracing::info!("login rejected for {username}");
            return Err(LedgerError::Auth);
        }

        if self.identity.is_none() {
            self.entered = true;
        }
        tracing::info!("{username} signed in");
        Ok(self.identity.insert(Identity {
            username: username.to_string(),
        }))
    }

    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!("{} signed out", identity.username);
        }
        self.entered = false;
    }

    /// Returns `true` once after each transition into `Authenticated`.
    pub fn take_entered(&mut self) -> bool {
        std::mem::take(&mut self.entered)
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("identity", &self.identity)
            .field("entered", &self.entered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedCredentials;

    fn gate(identity: Option<Identity>) -> SessionGate {
        SessionGate::new(identity, Box::new(FixedCredentials::new("user", "secret")))
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut gate = gate(None);
        assert!(matches!(gate.login("  ", "secret"), Err(LedgerError::Validation(_))));
        assert!(matches!(gate.login("user", "   "), Err(LedgerError::Validation(_))));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn wrong_password_does_not_transition() {
        let mut gate = gate(None);
        assert_eq!(gate.login("user", "nope").unwrap_err(), LedgerError::Auth);
        assert!(!gate.is_authenticated());
        assert!(!gate.take_entered());
    }

    #[test]
    fn login_arms_entry_once() {
        let mut gate = gate(None);
        let identity = gate.login("user", "secret").unwrap();
        assert_eq!(identity.username, "user");
        assert!(gate.take_entered());
        assert!(!gate.take_entered());
    }

    #[test]
    fn restored_identity_arms_entry() {
        let mut gate = gate(Some(Identity {
            username: "user".to_string(),
        }));
        assert!(gate.is_authenticated());
        assert!(gate.take_entered());
        assert!(!gate.take_entered());
    }

    #[test]
    fn logout_returns_to_anonymous() {
        let mut gate = gate(None);
        gate.login("user", "secret").unwrap();
        gate.logout();
        assert!(!gate.is_authenticated());
        assert!(!gate.take_entered());

        gate.login("user", "secret").unwrap();
        assert!(gate.take_entered());
    }
}
