use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::user::{get_user, User};
use crate::error::ApiError;
use crate::storage::{BrowserStorage, KeyValueStore};

pub const SESSION_KEY: &str = "session";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
    /// Kept in persistent storage instead of the tab's session storage.
    #[serde(default)]
    pub remember: bool,
}

impl Session {
    pub fn start(user: &User, remember: bool, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.user_name.clone(),
            expires_at: now + ttl,
            remember,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn refreshed(&self, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            expires_at: now + ttl,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthState {
    Checking,
    Authenticated(Session),
    Anonymous,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Where sessions live: "remember me" picks persistent storage, otherwise the tab's.
pub struct SessionStore<P, S> {
    persistent: P,
    tab: S,
}

impl SessionStore<BrowserStorage, BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage::persistent(), BrowserStorage::session())
    }
}

impl<P: KeyValueStore, S: KeyValueStore> SessionStore<P, S> {
    pub fn new(persistent: P, tab: S) -> Self {
        Self { persistent, tab }
    }

    pub fn load(&self) -> Option<Session> {
        self.read(&self.persistent).or_else(|| self.read(&self.tab))
    }

    fn read(&self, store: &impl KeyValueStore) -> Option<Session> {
        let raw = store.get(SESSION_KEY)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                log::warn!("dropping unreadable stored session: {}", err);
                store.remove(SESSION_KEY);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) {
        let Ok(raw) = serde_json::to_string(session) else {
            return;
        };
        if session.remember {
            self.tab.remove(SESSION_KEY);
            self.persistent.set(SESSION_KEY, &raw);
        } else {
            self.persistent.remove(SESSION_KEY);
            self.tab.set(SESSION_KEY, &raw);
        }
    }

    pub fn clear(&self) {
        self.persistent.remove(SESSION_KEY);
        self.tab.remove(SESSION_KEY);
    }

    /// Stored session still within its lifetime; an expired one is discarded.
    pub fn restore(&self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.load()?;
        if session.is_expired(now) {
            log::info!("stored session for {} expired", session.user_name);
            self.clear();
            return None;
        }
        Some(session)
    }
}

/// Confirms the stored identity with the backend and extends its lifetime.
pub async fn validate(session: Session, ttl: Duration) -> Result<Session, ApiError> {
    let user = get_user(&session.user_id).await?;
    Ok(Session {
        user_name: user.user_name,
        ..session.refreshed(Utc::now(), ttl)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn user() -> User {
        User {
            id: "u1".into(),
            user_name: "ana".into(),
            password_hash: String::new(),
            user_type_id: 2,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn store() -> SessionStore<MemoryStore, MemoryStore> {
        SessionStore::new(MemoryStore::default(), MemoryStore::default())
    }

    #[test]
    fn remember_me_selects_persistent_storage() {
        let store = store();
        let session = Session::start(&user(), true, now(), Duration::hours(8));
        store.save(&session);
        assert!(store.persistent.get(SESSION_KEY).is_some());
        assert!(store.tab.get(SESSION_KEY).is_none());
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn session_only_uses_tab_storage() {
        let store = store();
        let session = Session::start(&user(), false, now(), Duration::hours(8));
        store.save(&session);
        assert!(store.persistent.get(SESSION_KEY).is_none());
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn expired_session_is_cleared_on_restore() {
        let store = store();
        store.save(&Session::start(&user(), true, now(), Duration::minutes(30)));
        assert!(store.restore(now() + Duration::minutes(10)).is_some());
        assert!(store.restore(now() + Duration::minutes(30)).is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn garbage_is_dropped() {
        let store = store();
        store.persistent.set(SESSION_KEY, "u1");
        assert!(store.load().is_none());
        assert!(store.persistent.get(SESSION_KEY).is_none());
    }

    #[test]
    fn clear_removes_both_locations() {
        let store = store();
        store.persistent.set(SESSION_KEY, "{}");
        store.tab.set(SESSION_KEY, "{}");
        store.clear();
        assert!(store.persistent.get(SESSION_KEY).is_none());
        assert!(store.tab.get(SESSION_KEY).is_none());
    }

    #[test]
    fn refresh_extends_expiry() {
        let session = Session::start(&user(), false, now(), Duration::hours(1));
        let later = now() + Duration::minutes(50);
        let refreshed = session.refreshed(later, Duration::hours(1));
        assert_eq!(refreshed.expires_at, later + Duration::hours(1));
        assert_eq!(refreshed.user_id, "u1");
    }
}
