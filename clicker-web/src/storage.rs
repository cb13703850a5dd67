//! Session persistence in browser `localStorage`.
use clicker_core::{PersistedSession, SessionStorage};
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};

/// Web-specific session storage using localStorage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalSessionStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for WebStorageError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl SessionStorage for LocalSessionStorage {
    type Error = WebStorageError;

    fn load_session(&self, key: &str) -> Result<Option<PersistedSession>, Self::Error> {
        match LocalStorage::get::<PersistedSession>(key) {
            Ok(session) => Ok(Some(session)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_session(&self, key: &str, session: &PersistedSession) -> Result<(), Self::Error> {
        LocalStorage::set(key, session).map_err(Into::into)
    }

    fn clear_session(&self, key: &str) -> Result<(), Self::Error> {
        LocalStorage::delete(key);
        Ok(())
    }
}
