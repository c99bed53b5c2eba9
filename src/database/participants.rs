//! Participant Repository - maps identifiers to stored participant records
//!
//! Records are JSON objects stored under the participant's identifier:
//! `{"username": ..., "points": ..., "password": ...}`.
//!
//! `fetch_all` lists every key and then reads each one. The store offers no
//! snapshot primitive, so records may change between the listing and the
//! reads (read skew). Keys that vanish mid-scan are skipped.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::store::KeyValueStore;
use crate::error::{LeaderboardError, Result};

/// A registered participant as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(rename = "username")]
    pub identifier: String,

    #[serde(rename = "points")]
    pub score: u64,

    /// Opaque credential hash (argon2 PHC string, or bcrypt for legacy records)
    #[serde(rename = "password", default)]
    pub credential_hash: String,
}

impl Participant {
    pub fn new(identifier: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            score: 0,
            credential_hash: credential_hash.into(),
        }
    }

    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }
}

/// Decode a stored value, checking it belongs to the key it was read from.
fn decode(key: &str, raw: &str) -> Result<Participant> {
    let participant: Participant =
        serde_json::from_str(raw).map_err(|e| LeaderboardError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    if participant.identifier != key {
        return Err(LeaderboardError::CorruptRecord {
            key: key.to_string(),
            reason: format!("record identifier {:?} does not match key", participant.identifier),
        });
    }

    Ok(participant)
}

#[derive(Clone)]
pub struct ParticipantRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ParticipantRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read one participant. Absent records are `Ok(None)`.
    pub async fn fetch_one(&self, identifier: &str) -> Result<Option<Participant>> {
        match self.store.get(identifier).await? {
            Some(raw) => decode(identifier, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Read every participant in the store.
    ///
    /// Cost is one key listing plus one read per key. Records that fail to
    /// decode are logged and left out; any store failure aborts the fetch.
    pub async fn fetch_all(&self) -> Result<Vec<Participant>> {
        let keys = self.store.list_keys().await?;
        let mut participants = Vec::with_capacity(keys.len());

        for key in keys {
            let raw = match self.store.get(&key).await? {
                Some(raw) => raw,
                None => {
                    debug!(key = %key, "Key disappeared during scan, skipping");
                    continue;
                }
            };

            match decode(&key, &raw) {
                Ok(participant) => participants.push(participant),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping undecodable participant record");
                }
            }
        }

        debug!(count = participants.len(), "Fetched participant snapshot");
        Ok(participants)
    }

    /// Insert or overwrite a participant by identifier.
    pub async fn save(&self, participant: &Participant) -> Result<()> {
        let raw = serde_json::to_string(participant)
            .map_err(|e| LeaderboardError::Serialization(e.to_string()))?;

        self.store.set(&participant.identifier, &raw).await?;

        debug!(identifier = %participant.identifier, score = participant.score, "Participant saved");
        Ok(())
    }

    /// Add `delta` to a participant's score and persist it.
    ///
    /// This is a read-modify-write: two concurrent increments for the same
    /// identifier can race and one of them may be lost.
    pub async fn increment_score(&self, identifier: &str, delta: u64) -> Result<Option<Participant>> {
        let Some(mut participant) = self.fetch_one(identifier).await? else {
            return Ok(None);
        };

        participant.score = participant.score.saturating_add(delta);
        self.save(&participant).await?;

        Ok(Some(participant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::error::StoreError;
    use async_trait::async_trait;

    /// Lists keys that were deleted before they could be read.
    struct VanishingStore {
        inner: MemoryStore,
        vanished: Vec<String>,
    }

    #[async_trait]
    impl KeyValueStore for VanishingStore {
        async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
            if self.vanished.iter().any(|k| k == key) {
                return Ok(None);
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
            self.inner.set(key, value).await
        }

        async fn list_keys(&self) -> std::result::Result<Vec<String>, StoreError> {
            let mut keys = self.inner.list_keys().await?;
            keys.extend(self.vanished.iter().cloned());
            Ok(keys)
        }
    }

    fn repo_with_store() -> (ParticipantRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (ParticipantRepository::new(store.clone()), store)
    }

    #[test]
    fn test_wire_field_names() {
        let p = Participant::new("alice", "hash").with_score(7);
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["points"], 7);
        assert_eq!(json["password"], "hash");
    }

    #[tokio::test]
    async fn test_fetch_one_absent() {
        let (repo, _) = repo_with_store();
        assert!(repo.fetch_one("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_fetch_one() {
        let (repo, _) = repo_with_store();
        let p = Participant::new("alice", "hash").with_score(3);

        repo.save(&p).await.unwrap();
        assert_eq!(repo.fetch_one("alice").await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn test_fetch_one_corrupt_is_error() {
        let (repo, store) = repo_with_store();
        store.set("broken", "not json").await.unwrap();

        let err = repo.fetch_one("broken").await.unwrap_err();
        assert!(matches!(err, LeaderboardError::CorruptRecord { .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_skips_corrupt_records() {
        let (repo, store) = repo_with_store();
        repo.save(&Participant::new("alice", "h").with_score(5)).await.unwrap();
        repo.save(&Participant::new("bob", "h").with_score(2)).await.unwrap();
        store.set("garbage", "{\"unexpected\": true}").await.unwrap();
        store.set("plain", "hello").await.unwrap();

        let mut ids: Vec<_> = repo
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.identifier)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_all_skips_mismatched_identifier() {
        let (repo, store) = repo_with_store();
        repo.save(&Participant::new("alice", "h").with_score(5)).await.unwrap();
        store
            .set("mallory", r#"{"username":"alice","points":999,"password":""}"#)
            .await
            .unwrap();

        let all = repo.fetch_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].score, 5);
    }

    #[tokio::test]
    async fn test_fetch_all_skips_vanished_keys() {
        let store = Arc::new(VanishingStore {
            inner: MemoryStore::new(),
            vanished: vec!["carol".to_string(), "dave".to_string()],
        });
        let repo = ParticipantRepository::new(store.clone());
        repo.save(&Participant::new("alice", "h").with_score(5)).await.unwrap();
        repo.save(&Participant::new("bob", "h").with_score(2)).await.unwrap();

        assert_eq!(store.list_keys().await.unwrap().len(), 4);

        let mut all = repo.fetch_all().await.unwrap();
        all.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        let ids: Vec<_> = all.iter().map(|p| (p.identifier.as_str(), p.score)).collect();
        assert_eq!(ids, vec![("alice", 5), ("bob", 2)]);
    }

    #[tokio::test]
    async fn test_increment_score() {
        let (repo, _) = repo_with_store();
        repo.save(&Participant::new("alice", "h")).await.unwrap();

        let updated = repo.increment_score("alice", 1).await.unwrap().unwrap();
        assert_eq!(updated.score, 1);
        assert_eq!(repo.fetch_one("alice").await.unwrap().unwrap().score, 1);

        assert!(repo.increment_score("ghost", 1).await.unwrap().is_none());
    }
}
