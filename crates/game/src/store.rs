//! Round State Stores: where a player's `GameSession` lives between requests.
//!
//! The store is the only place a session is serialized. Two implementations:
//! - `MemoryRoundStore`: a map behind an async lock
//! - `JsonFileRoundStore`: one JSON file per session id

use crate::error::StorageError;
use crate::session::GameSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Opaque identifier of one player's round
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-value persistence of one `GameSession` per session id
#[async_trait]
pub trait RoundStateStore: Send + Sync {
    async fn load(&self, session: &SessionId) -> Result<Option<GameSession>, StorageError>;

    async fn save(&self, session: &SessionId, state: &GameSession) -> Result<(), StorageError>;

    /// Forget the session; clearing an unknown session is not an error
    async fn clear(&self, session: &SessionId) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryRoundStore {
    sessions: RwLock<HashMap<SessionId, GameSession>>,
}

impl MemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundStateStore for MemoryRoundStore {
    async fn load(&self, session: &SessionId) -> Result<Option<GameSession>, StorageError> {
        Ok(self.sessions.read().await.get(session).cloned())
    }

    async fn save(&self, session: &SessionId, state: &GameSession) -> Result<(), StorageError> {
        self.sessions.write().await.insert(session.clone(), state.clone());
        Ok(())
    }

    async fn clear(&self, session: &SessionId) -> Result<(), StorageError> {
        self.sessions.write().await.remove(session);
        Ok(())
    }
}

/// Stores each session as `<dir>/<session id>.json`.
///
/// Session ids may only contain ASCII letters, digits, `-` and `_`.
pub struct JsonFileRoundStore {
    dir: PathBuf,
}

impl JsonFileRoundStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session: &SessionId) -> Result<PathBuf, StorageError> {
        let id = session.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidSessionId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl RoundStateStore for JsonFileRoundStore {
    async fn load(&self, session: &SessionId) -> Result<Option<GameSession>, StorageError> {
        let path = self.path_for(session)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &SessionId, state: &GameSession) -> Result<(), StorageError> {
        let path = self.path_for(session)?;
        let bytes = serde_json::to_vec_pretty(state)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        // atomic replace
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("Saved round state to {}", path.display());
        Ok(())
    }

    async fn clear(&self, session: &SessionId) -> Result<(), StorageError> {
        let path = self.path_for(session)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::CuratedMovie;
    use curation::AnswerSet;
    use tempfile::TempDir;

    fn sample_session() -> GameSession {
        let mut session = GameSession::new(AnswerSet::new(
            "Meg Ryan",
            vec![CuratedMovie::new(858, "Sleepless in Seattle", 227_799_884).with_release_year(1993)],
        ));
        session
            .record_guess(CuratedMovie::new(9489, "You've Got Mail", 250_821_495))
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryRoundStore::new();
        let id = SessionId::generate();

        assert!(store.load(&id).await.unwrap().is_none());
        store.save(&id, &sample_session()).await.unwrap();
        assert_eq!(store.load(&id).await.unwrap(), Some(sample_session()));

        store.clear(&id).await.unwrap();
        assert!(store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileRoundStore::new(temp_dir.path().join("sessions"));
        let id = SessionId::new("player-1");

        store.save(&id, &sample_session()).await.unwrap();
        assert!(temp_dir.path().join("sessions/player-1.json").exists());

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded, sample_session());
        assert_eq!(loaded.strikes(), 1);

        store.clear(&id).await.unwrap();
        store.clear(&id).await.unwrap();
        assert!(store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_store_rejects_path_like_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileRoundStore::new(temp_dir.path());

        let err = store.load(&SessionId::new("../escape")).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidSessionId(_)));
    }

    #[tokio::test]
    async fn test_json_store_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("bad.json"), "{not json").unwrap();
        let store = JsonFileRoundStore::new(temp_dir.path());

        let err = store.load(&SessionId::new("bad")).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
