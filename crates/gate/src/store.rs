use std::collections::HashMap;
use std::sync::Mutex;

/// Bearer-token carrier, keyed by name.
///
/// In production this is a cookie jar owned by the hosting layer; the gate
/// only ever asks it for one named value. `set`/`delete` exist for the
/// login/logout flows the hosting layer drives.
pub trait TokenStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: String);
    fn delete(&self, name: &str);
}

/// In-memory token store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(name: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(name, value.into());
        store
    }
}

impl MemoryTokenStore {
    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map of strings is still a map of strings.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values().get(name).cloned()
    }

    fn set(&self, name: &str, value: String) {
        self.values().insert(name.to_string(), value);
    }

    fn delete(&self, name: &str) {
        self.values().remove(name);
    }
}
