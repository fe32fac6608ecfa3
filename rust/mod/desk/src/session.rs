//! SessionManager: login, logout and session restore.
//!
//! The active identity is persisted under `keys::SESSION` as a single JSON
//! object with the credential stripped. A restored session is trusted as-is:
//! there is no expiry and no re-verification.

use brokerdesk_core::DeskConfig;
use tracing::{info, warn};

use crate::error::{AuthError, StorageError};
use crate::model::{BrokerAccount, Identity, Role};
use crate::store::{keys, RecordStore};
use crate::store_impls::verify_password;

/// Id of the synthetic administrator identity.
pub const ADMIN_ID: &str = "admin";
pub const ADMIN_NAME: &str = "Administrator";

/// Built-in administrator login, used when the config carries no override.
pub const BUILTIN_ADMIN_EMAIL: &str = "admin@brokerdesk.local";
pub const BUILTIN_ADMIN_SECRET: &str = "brokerdesk-admin";

/// The single administrator credential.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub email: String,
    /// argon2id PHC string. `None` means the built-in secret.
    pub password_hash: Option<String>,
}

impl Default for AdminCredential {
    fn default() -> Self {
        Self {
            email: BUILTIN_ADMIN_EMAIL.to_string(),
            password_hash: None,
        }
    }
}

impl AdminCredential {
    /// Built-in credential with any `[admin]` overrides from config applied.
    pub fn from_config(config: &DeskConfig) -> Self {
        let mut cred = Self::default();
        if let Some(email) = &config.admin.email {
            cred.email = email.clone();
        }
        cred.password_hash = config.admin.password_hash.clone();
        cred
    }

    fn matches(&self, email: &str, secret: &str) -> bool {
        if email != self.email {
            return false;
        }
        match &self.password_hash {
            Some(hash) => verify_password(secret, hash),
            None => secret == BUILTIN_ADMIN_SECRET,
        }
    }

    fn identity(&self) -> Identity {
        Identity {
            id: ADMIN_ID.to_string(),
            name: ADMIN_NAME.to_string(),
            email: self.email.clone(),
            role: Role::Admin,
            phone: None,
            address: None,
            registry_number: None,
            photo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

pub struct SessionManager {
    store: RecordStore,
    admin: AdminCredential,
    state: SessionState,
}

impl SessionManager {
    /// A manager in the Anonymous state. Call `restore_session` to pick up a
    /// persisted login.
    pub fn new(store: RecordStore, admin: AdminCredential) -> Self {
        Self {
            store,
            admin,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Anonymous => None,
            SessionState::Authenticated(identity) => Some(identity),
        }
    }

    /// Authenticate against the persisted roster, then the administrator
    /// credential. On failure the state is left untouched.
    pub fn login(&mut self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        let roster: Vec<BrokerAccount> = self.store.load(keys::USERS)?;

        let identity = if let Some(account) = roster
            .iter()
            .find(|a| a.email == email && verify_password(secret, &a.password_hash))
        {
            account.identity()
        } else if self.admin.matches(email, secret) {
            self.admin.identity()
        } else {
            warn!("login rejected for {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        self.store.persist_value(keys::SESSION, &identity)?;
        info!("logged in {} as {} ({})", identity.email, identity.role, identity.id);
        self.state = SessionState::Authenticated(identity.clone());
        Ok(identity)
    }

    /// Adopt the persisted identity, if any. Returns the resulting identity.
    pub fn restore_session(&mut self) -> Result<Option<&Identity>, StorageError> {
        if let Some(identity) = self.store.load_value::<Identity>(keys::SESSION)? {
            self.state = SessionState::Authenticated(identity);
        }
        Ok(self.current())
    }

    /// Clear the persisted session and return to Anonymous.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.store.remove(keys::SESSION)?;
        if let SessionState::Authenticated(identity) = &self.state {
            info!("logged out {}", identity.email);
        }
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Replace the active identity after a profile edit. Ignored unless
    /// `identity` is the one currently logged in.
    pub fn refresh(&mut self, identity: Identity) -> Result<bool, StorageError> {
        match &self.state {
            SessionState::Authenticated(current) if current.id == identity.id => {}
            _ => return Ok(false),
        }
        self.store.persist_value(keys::SESSION, &identity)?;
        self.state = SessionState::Authenticated(identity);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brokerdesk_kv::{KVStore, MemoryKV};

    use super::*;
    use crate::store_impls::hash_password;

    fn seeded() -> (Arc<MemoryKV>, RecordStore) {
        let kv = Arc::new(MemoryKV::new());
        let store = RecordStore::new(kv.clone());
        let ana = BrokerAccount {
            id: "7".into(),
            name: "Ana".into(),
            email: "ana@x.com".into(),
            phone: String::new(),
            address: String::new(),
            registry_number: None,
            photo: None,
            password_hash: hash_password("s3nha1").unwrap(),
            role: Role::Broker,
        };
        store.persist(keys::USERS, &[ana]).unwrap();
        (kv, store)
    }

    #[test]
    fn broker_login_persists_sanitized_identity() {
        let (kv, store) = seeded();
        let mut session = SessionManager::new(store, AdminCredential::default());

        let identity = session.login("ana@x.com", "s3nha1").unwrap();
        assert_eq!(identity.id, "7");
        assert_eq!(identity.role, Role::Broker);
        assert_eq!(session.current().map(|i| i.id.as_str()), Some("7"));

        let raw = kv.get(keys::SESSION).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert!(json.is_object());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["id"], "7");
    }

    #[test]
    fn wrong_secret_keeps_anonymous() {
        let (kv, store) = seeded();
        let mut session = SessionManager::new(store, AdminCredential::default());

        let err = session.login("ana@x.com", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(kv.get(keys::SESSION).unwrap().is_none());
    }

    #[test]
    fn builtin_admin_login() {
        let (_, store) = seeded();
        let mut session = SessionManager::new(store, AdminCredential::default());

        let identity = session.login(BUILTIN_ADMIN_EMAIL, BUILTIN_ADMIN_SECRET).unwrap();
        assert_eq!(identity.id, ADMIN_ID);
        assert!(identity.is_admin());
    }

    #[test]
    fn configured_admin_hash_replaces_builtin_secret() {
        let (_, store) = seeded();
        let mut config = DeskConfig::default();
        config.admin.email = Some("boss@x.com".into());
        config.admin.password_hash = Some(hash_password("topsecret").unwrap());
        let mut session = SessionManager::new(store, AdminCredential::from_config(&config));

        assert!(session.login(BUILTIN_ADMIN_EMAIL, BUILTIN_ADMIN_SECRET).is_err());
        assert!(session.login("boss@x.com", BUILTIN_ADMIN_SECRET).is_err());
        assert!(session.login("boss@x.com", "topsecret").unwrap().is_admin());
    }

    #[test]
    fn restore_then_logout() {
        let (_, store) = seeded();
        let mut first = SessionManager::new(store.clone(), AdminCredential::default());
        first.login("ana@x.com", "s3nha1").unwrap();

        let mut second = SessionManager::new(store.clone(), AdminCredential::default());
        assert_eq!(second.state(), &SessionState::Anonymous);
        let restored = second.restore_session().unwrap().cloned();
        assert_eq!(restored.map(|i| i.id), Some("7".to_string()));

        second.logout().unwrap();
        assert_eq!(second.state(), &SessionState::Anonymous);

        let mut third = SessionManager::new(store, AdminCredential::default());
        assert!(third.restore_session().unwrap().is_none());
    }

    #[test]
    fn malformed_session_is_absent() {
        let (kv, store) = seeded();
        kv.set(keys::SESSION, b"[1,2,3]").unwrap();
        let mut session = SessionManager::new(store, AdminCredential::default());
        assert!(session.restore_session().unwrap().is_none());
    }

    #[test]
    fn refresh_only_touches_active_identity() {
        let (_, store) = seeded();
        let mut session = SessionManager::new(store, AdminCredential::default());
        let mut identity = session.login("ana@x.com", "s3nha1").unwrap();

        identity.name = "Ana Paula".into();
        assert!(session.refresh(identity.clone()).unwrap());
        assert_eq!(session.current().map(|i| i.name.as_str()), Some("Ana Paula"));

        identity.id = "9".into();
        assert!(!session.refresh(identity).unwrap());
        assert_eq!(session.current().map(|i| i.id.as_str()), Some("7"));
    }
}
