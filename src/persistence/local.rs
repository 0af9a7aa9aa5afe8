//! Browser LocalStorage store (wasm32)

use web_sys::Storage;

use super::KeyValueStore;
use crate::error::StoreError;

pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|_| StoreError::Unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| StoreError::Rejected {
                key: key.to_string(),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|_| StoreError::Rejected {
                key: key.to_string(),
            })
    }
}
