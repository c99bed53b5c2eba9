//! Account operations: register-or-login and score changes
//!
//! Score increments go through the repository's read-modify-write and are
//! not atomic across concurrent requests for the same participant.

use tracing::{debug, info, warn};

use crate::accounts::credentials;
use crate::database::participants::{Participant, ParticipantRepository};
use crate::error::AccountError;

/// Usernames are stored verbatim as keys, and requests name them through a
/// trimmed header, so surrounding whitespace would make an account unreachable.
fn validate_username(username: &str) -> Result<(), AccountError> {
    if username.trim().is_empty() {
        return Err(AccountError::InvalidInput("username must not be empty".to_string()));
    }
    if username.trim() != username {
        return Err(AccountError::InvalidInput(
            "username must not start or end with whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Result of a login attempt that passed credential checks.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub participant: Participant,
    /// True when this call registered the participant.
    pub created: bool,
}

#[derive(Clone)]
pub struct AccountService {
    repository: ParticipantRepository,
}

impl AccountService {
    pub fn new(repository: ParticipantRepository) -> Self {
        Self { repository }
    }

    /// Register `username` on first sight, otherwise check the password.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AccountError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AccountError::InvalidInput("password must not be empty".to_string()));
        }

        match self.repository.fetch_one(username).await? {
            Some(mut existing) => {
                let stored = existing.credential_hash.clone();
                let candidate = password.to_string();
                let valid = tokio::task::spawn_blocking(move || {
                    credentials::verify_password(&candidate, &stored)
                })
                .await
                .map_err(|e| AccountError::Hashing(e.to_string()))??;

                if !valid {
                    warn!(username = %username, "Invalid credentials");
                    return Err(AccountError::InvalidCredentials);
                }

                if credentials::needs_rehash(&existing.credential_hash) {
                    let candidate = password.to_string();
                    existing.credential_hash =
                        tokio::task::spawn_blocking(move || credentials::hash_password(&candidate))
                            .await
                            .map_err(|e| AccountError::Hashing(e.to_string()))??;
                    self.repository.save(&existing).await?;
                    info!(username = %username, "Upgraded legacy credential hash");
                }

                debug!(username = %username, "Participant logged in");
                Ok(LoginOutcome {
                    participant: existing,
                    created: false,
                })
            }
            None => {
                let candidate = password.to_string();
                let hash = tokio::task::spawn_blocking(move || credentials::hash_password(&candidate))
                    .await
                    .map_err(|e| AccountError::Hashing(e.to_string()))??;

                let participant = Participant::new(username, hash);
                self.repository.save(&participant).await?;

                info!(username = %username, "Registered new participant");
                Ok(LoginOutcome {
                    participant,
                    created: true,
                })
            }
        }
    }

    pub async fn points(&self, username: &str) -> Result<u64, AccountError> {
        self.repository
            .fetch_one(username)
            .await?
            .map(|p| p.score)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// Add one point and return the new score.
    pub async fn increment_points(&self, username: &str) -> Result<u64, AccountError> {
        let updated = self
            .repository
            .increment_score(username, 1)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))?;

        debug!(username = %username, points = updated.score, "Points incremented");
        Ok(updated.score)
    }

    /// Whether a participant record exists for `username`.
    pub async fn exists(&self, username: &str) -> Result<bool, AccountError> {
        Ok(self.repository.fetch_one(username).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use std::sync::Arc;

    fn service() -> AccountService {
        AccountService::new(ParticipantRepository::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_login_registers_then_verifies() {
        let accounts = service();

        let first = accounts.login("alice", "secret").await.unwrap();
        assert!(first.created);
        assert_eq!(first.participant.score, 0);
        assert_ne!(first.participant.credential_hash, "secret");

        let second = accounts.login("alice", "secret").await.unwrap();
        assert!(!second.created);

        let wrong = accounts.login("alice", "nope").await;
        assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_input() {
        let accounts = service();
        assert!(matches!(
            accounts.login("", "pw").await,
            Err(AccountError::InvalidInput(_))
        ));
        assert!(matches!(
            accounts.login("bob", "").await,
            Err(AccountError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_login_rejects_padded_username() {
        let accounts = service();
        for name in [" bob", "bob ", "\tbob"] {
            assert!(matches!(
                accounts.login(name, "pw").await,
                Err(AccountError::InvalidInput(_))
            ));
        }
        assert!(!accounts.exists(" bob").await.unwrap());
        assert!(!accounts.exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_upgrades_bcrypt_record() {
        let store = Arc::new(MemoryStore::new());
        let repository = ParticipantRepository::new(store);
        let legacy = bcrypt::hash("hunter2", 4).unwrap();
        repository
            .save(&Participant::new("legacy", legacy.clone()).with_score(3))
            .await
            .unwrap();
        let accounts = AccountService::new(repository.clone());

        let outcome = accounts.login("legacy", "hunter2").await.unwrap();
        assert!(!outcome.created);
        assert_eq!(outcome.participant.score, 3);

        let stored = repository.fetch_one("legacy").await.unwrap().unwrap();
        assert!(stored.credential_hash.starts_with("$argon2"));
        assert_eq!(stored.score, 3);

        assert!(accounts.login("legacy", "hunter2").await.is_ok());
        assert!(matches!(
            accounts.login("legacy", "wrong").await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_points_and_increment() {
        let accounts = service();
        accounts.login("alice", "pw").await.unwrap();

        assert_eq!(accounts.increment_points("alice").await.unwrap(), 1);
        assert_eq!(accounts.increment_points("alice").await.unwrap(), 2);
        assert_eq!(accounts.points("alice").await.unwrap(), 2);

        assert!(matches!(
            accounts.points("ghost").await,
            Err(AccountError::NotFound(_))
        ));
        assert!(matches!(
            accounts.increment_points("ghost").await,
            Err(AccountError::NotFound(_))
        ));
        assert!(!accounts.exists("ghost").await.unwrap());
    }
}
