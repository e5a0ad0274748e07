//! Browser `localStorage` access: legacy blob data and the saved session.

use blob_sync::LocalTaskStore;
use serde::{Deserialize, Serialize};

const SESSION_KEY: &str = "blobby-session";

/// `LocalTaskStore` over `window.localStorage`. Every call is a no-op when
/// storage is unavailable (private mode, sandboxed frames).
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocalStore;

impl BrowserLocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl LocalTaskStore for BrowserLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("[STORAGE] Could not write {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Who is signed in on this browser
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

pub fn load_session() -> Option<Session> {
    let raw = BrowserLocalStore.get(SESSION_KEY)?;
    match serde_json::from_str::<Session>(&raw) {
        Ok(session) if !session.token.trim().is_empty() => Some(session),
        Ok(_) => None,
        Err(e) => {
            log::warn!("[STORAGE] Ignoring unreadable session: {}", e);
            None
        }
    }
}

pub fn save_session(session: &Session) {
    match serde_json::to_string(session) {
        Ok(raw) => BrowserLocalStore.set(SESSION_KEY, &raw),
        Err(e) => log::warn!("[STORAGE] Could not save session: {}", e),
    }
}

pub fn clear_session() {
    BrowserLocalStore.remove(SESSION_KEY);
}
