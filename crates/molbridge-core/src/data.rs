//! Mapping-style view over a molecule's free-form property store.

use crate::errors::BridgeError;
use crate::toolkit::Toolkit;

/// A live view, not a snapshot: every read re-queries the underlying store,
/// every write lands in it immediately. Key order is whatever the toolkit
/// provides.
pub struct MoleculeData<'a, T: Toolkit> {
    handle: &'a mut T::Handle,
}

impl<'a, T: Toolkit> MoleculeData<'a, T> {
    pub(crate) fn new(handle: &'a mut T::Handle) -> Self {
        MoleculeData { handle }
    }

    pub fn keys(&self) -> Vec<String> {
        T::prop_keys(self.handle)
    }

    pub fn values(&self) -> Vec<String> {
        self.keys().iter().filter_map(|k| T::prop_get(self.handle, k)).collect()
    }

    pub fn items(&self) -> Vec<(String, String)> {
        self.keys()
            .into_iter()
            .filter_map(|k| T::prop_get(self.handle, &k).map(|v| (k, v)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        T::prop_get(self.handle, key).is_some()
    }

    pub fn get(&self, key: &str) -> Result<String, BridgeError> {
        T::prop_get(self.handle, key).ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))
    }

    /// Values are coerced to text, whatever their source type.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        T::prop_set(self.handle, key, &value.to_string())
    }

    /// Fails with `KeyNotFound` when the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<(), BridgeError> {
        if T::prop_remove(self.handle, key) {
            Ok(())
        } else {
            Err(BridgeError::KeyNotFound(key.to_string()))
        }
    }

    pub fn clear(&mut self) {
        for key in self.keys() {
            T::prop_remove(self.handle, &key);
        }
    }

    pub fn update<K: ToString, V: ToString>(&mut self, entries: impl IntoIterator<Item = (K, V)>) {
        for (k, v) in entries {
            self.set(&k.to_string(), v);
        }
    }
}
