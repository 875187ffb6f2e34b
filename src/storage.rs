use std::cell::RefCell;
use std::collections::HashMap;

/// String key/value store backing the few pieces of state that outlive a page.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    /// `localStorage`: survives browser restarts.
    Persistent,
    /// `sessionStorage`: cleared with the tab.
    Session,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowserStorage {
    durability: Durability,
}

impl BrowserStorage {
    pub fn persistent() -> Self {
        Self {
            durability: Durability::Persistent,
        }
    }

    pub fn session() -> Self {
        Self {
            durability: Durability::Session,
        }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        let storage = match self.durability {
            Durability::Persistent => window.local_storage(),
            Durability::Session => window.session_storage(),
        };
        storage.ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("could not write '{}' to {:?} storage", key, self.durability);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory store used where no browser is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}
