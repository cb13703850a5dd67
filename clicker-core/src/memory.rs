//! In-memory [`SessionStorage`] used by native tools and tests.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::SessionStorage;
use crate::state::PersistedSession;

/// Keeps serialized sessions in a shared map, mirroring browser key/value storage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for `key`, as a browser devtools panel would show it.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
    }
}

impl SessionStorage for MemoryStorage {
    type Error = serde_json::Error;

    fn load_session(&self, key: &str) -> Result<Option<PersistedSession>, Self::Error> {
        self.entries
            .borrow()
            .get(key)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
    }

    fn save_session(&self, key: &str, session: &PersistedSession) -> Result<(), Self::Error> {
        let raw = serde_json::to_string(session)?;
        self.entries.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn clear_session(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_clears() {
        let storage = MemoryStorage::new();
        assert!(storage.load_session("k").unwrap().is_none());
        let session = PersistedSession {
            balance: 9,
            click_count: 2,
            ..PersistedSession::default()
        };
        storage.save_session("k", &session).unwrap();
        assert_eq!(storage.load_session("k").unwrap(), Some(session));
        storage.clear_session("k").unwrap();
        assert!(storage.raw("k").is_none());
    }

    #[test]
    fn corrupt_entries_surface_as_errors() {
        let storage = MemoryStorage::new();
        storage.insert_raw("k", "{not json");
        assert!(storage.load_session("k").is_err());
    }
}
