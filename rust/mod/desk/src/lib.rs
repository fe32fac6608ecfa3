//! Desk: session and record store for an insurance-broker workspace.
//!
//! # Resources
//!
//! - **BrokerAccount**: roster entry with an argon2id credential
//! - **Client**, **Appointment**, **Sale**, **Quote**, **Link**: records
//!   stamped with the owning broker
//! - **Notification**: administrator message, broadcast or directed
//!
//! Each resource is one JSON array under a fixed key of a `KVStore`. The
//! active session is a single JSON object under `desk:session`.
//!
//! # Usage
//!
//! ```ignore
//! use desk::{Desk, session::AdminCredential};
//!
//! let mut desk = Desk::open(kv, AdminCredential::default())?;
//! let me = desk.login("ana@x.com", "s3nha1")?;
//! let mine = desk::scope::list_owned_by(&desk.clients, &me.id);
//! ```

pub mod collection;
pub mod error;
pub mod model;
pub mod notify;
pub mod report;
pub mod roster;
pub mod scope;
pub mod session;
pub mod store;
pub mod store_impls;
pub mod validate;

use std::sync::Arc;

use brokerdesk_core::ServiceError;
use brokerdesk_kv::KVStore;

use crate::collection::Collection;
use crate::error::{AuthError, StorageError};
use crate::model::*;
use crate::notify::NotificationRouter;
use crate::report::{AdminOverview, BrokerDashboard, BrokerSummary, SalesReport};
use crate::roster::Roster;
use crate::scope::{list_owned_by, QueryScope};
use crate::session::{AdminCredential, SessionManager};
use crate::store::RecordStore;

/// Owns the store handle, the session and every collection snapshot.
pub struct Desk {
    store: RecordStore,
    session: SessionManager,
    pub brokers: Collection<BrokerAccount>,
    pub clients: Collection<Client>,
    pub appointments: Collection<Appointment>,
    pub sales: Collection<Sale>,
    pub quotes: Collection<Quote>,
    pub links: Collection<Link>,
    pub notifications: Collection<Notification>,
}

impl Desk {
    /// Load every collection and restore any persisted session.
    pub fn open(kv: Arc<dyn KVStore>, admin: AdminCredential) -> Result<Self, StorageError> {
        let store = RecordStore::new(kv);
        let mut session = SessionManager::new(store.clone(), admin);
        session.restore_session()?;

        Ok(Self {
            brokers: Collection::open(store.clone())?,
            clients: Collection::open(store.clone())?,
            appointments: Collection::open(store.clone())?,
            sales: Collection::open(store.clone())?,
            quotes: Collection::open(store.clone())?,
            links: Collection::open(store.clone())?,
            notifications: Collection::open(store.clone())?,
            session,
            store,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn current(&self) -> Option<&Identity> {
        self.session.current()
    }

    pub fn login(&mut self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        self.session.login(email, secret)
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.session.logout()
    }

    /// The logged-in identity, or `Unauthorized`.
    pub fn require_login(&self) -> Result<Identity, ServiceError> {
        self.current()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("not logged in".into()))
    }

    /// The logged-in broker. The administrator has no records of its own.
    pub fn require_broker(&self) -> Result<Identity, ServiceError> {
        let identity = self.require_login()?;
        if identity.is_admin() {
            return Err(ServiceError::PermissionDenied(
                "this action is for brokers".into(),
            ));
        }
        Ok(identity)
    }

    pub fn require_admin(&self) -> Result<Identity, ServiceError> {
        let identity = self.require_login()?;
        if !identity.is_admin() {
            return Err(ServiceError::PermissionDenied(
                "administrator access required".into(),
            ));
        }
        Ok(identity)
    }

    /// Query scope for the logged-in identity, if any.
    pub fn scope(&self) -> Option<QueryScope<'_>> {
        self.current().map(QueryScope::for_identity)
    }

    pub fn roster(&mut self) -> Roster<'_> {
        Roster::new(&mut self.brokers)
    }

    pub fn router(&mut self) -> NotificationRouter<'_> {
        NotificationRouter::new(&mut self.notifications)
    }

    /// Edit a broker profile; if it is the active identity, the persisted
    /// session is refreshed too.
    pub fn update_profile(
        &mut self,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<BrokerAccount, ServiceError> {
        let updated = Roster::new(&mut self.brokers).update_profile(id, patch)?;
        self.session.refresh(updated.identity())?;
        Ok(updated)
    }

    /// Re-read every collection from storage.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.brokers.reload()?;
        self.clients.reload()?;
        self.appointments.reload()?;
        self.sales.reload()?;
        self.quotes.reload()?;
        self.links.reload()?;
        self.notifications.reload()
    }

    pub fn broker_dashboard(&self, broker_id: &str) -> BrokerDashboard {
        let sales = SalesReport::build(list_owned_by(&self.sales, broker_id));
        BrokerDashboard {
            clients: list_owned_by(&self.clients, broker_id).len(),
            appointments: list_owned_by(&self.appointments, broker_id).len(),
            sales: sales.total,
            quotes: list_owned_by(&self.quotes, broker_id).len(),
            unread_notifications: notify::unread_count(&self.notifications, broker_id),
        }
    }

    pub fn admin_overview(&self) -> AdminOverview {
        AdminOverview {
            brokers: self.brokers.len(),
            clients: self.clients.len(),
            sales: SalesReport::build(self.sales.records()).total,
        }
    }

    pub fn broker_summaries(&self) -> Vec<BrokerSummary> {
        report::broker_summaries(
            self.brokers.records(),
            self.clients.records(),
            self.sales.records(),
            self.appointments.records(),
        )
    }
}

#[cfg(test)]
mod tests {
    use brokerdesk_kv::MemoryKV;
    use serde_json::json;

    use super::*;
    use crate::session::{BUILTIN_ADMIN_EMAIL, BUILTIN_ADMIN_SECRET};

    fn broker(name: &str, email: &str) -> CreateBroker {
        CreateBroker {
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            address: String::new(),
            registry_number: None,
            photo: None,
            password: "s3nha1".into(),
        }
    }

    #[test]
    fn role_guards() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let mut desk = Desk::open(kv, AdminCredential::default()).unwrap();
        assert_eq!(desk.require_login().unwrap_err().error_code(), "UNAUTHENTICATED");

        desk.roster().register(broker("Ana", "ana@x.com")).unwrap();
        desk.login("ana@x.com", "s3nha1").unwrap();
        assert!(desk.require_broker().is_ok());
        assert_eq!(desk.require_admin().unwrap_err().error_code(), "PERMISSION_DENIED");

        desk.logout().unwrap();
        desk.login(BUILTIN_ADMIN_EMAIL, BUILTIN_ADMIN_SECRET).unwrap();
        assert!(desk.require_admin().is_ok());
        assert!(desk.require_broker().is_err());
    }

    #[test]
    fn profile_edit_refreshes_session() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let mut desk = Desk::open(kv.clone(), AdminCredential::default()).unwrap();
        let ana = desk.roster().register(broker("Ana", "ana@x.com")).unwrap();
        desk.login("ana@x.com", "s3nha1").unwrap();

        desk.update_profile(&ana.id, &json!({"name": "Ana Paula"})).unwrap();
        assert_eq!(desk.current().map(|i| i.name.as_str()), Some("Ana Paula"));

        // A fresh desk restores the refreshed identity.
        let reopened = Desk::open(kv, AdminCredential::default()).unwrap();
        assert_eq!(reopened.current().map(|i| i.name.as_str()), Some("Ana Paula"));
    }

    #[test]
    fn admin_edits_another_brokers_profile() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let mut desk = Desk::open(kv, AdminCredential::default()).unwrap();
        let ana = desk.roster().register(broker("Ana", "ana@x.com")).unwrap();
        desk.login(BUILTIN_ADMIN_EMAIL, BUILTIN_ADMIN_SECRET).unwrap();

        let updated = desk
            .update_profile(&ana.id, &json!({"phone": "21 3333-0000", "role": "admin"}))
            .unwrap();
        assert_eq!(updated.phone, "21 3333-0000");
        assert_eq!(updated.role, Role::Broker);
        assert_eq!(desk.brokers.get(&ana.id), Some(&updated));

        // The administrator session is untouched.
        let me = desk.current().unwrap();
        assert!(me.is_admin());
        assert_eq!(me.email, BUILTIN_ADMIN_EMAIL);

        let err = desk.update_profile("ghost", &json!({"name": "x"})).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn dashboard_counts_only_own_records() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let mut desk = Desk::open(kv, AdminCredential::default()).unwrap();
        let input = |name: &str| CreateClient {
            name: name.into(),
            address: String::new(),
            email: format!("{}@x.com", name),
            phone: String::new(),
            plan_type: PlanType::LifeInsurance,
        };
        desk.clients.create(input("a"), "7").unwrap();
        desk.clients.create(input("b"), "9").unwrap();
        desk.router().broadcast("hello", "all", None).unwrap();
        desk.router().send_to("9", "hi", "nine", None).unwrap();

        let dash = desk.broker_dashboard("7");
        assert_eq!(dash.clients, 1);
        assert_eq!(dash.sales.count, 0);
        assert_eq!(dash.unread_notifications, 1);

        let overview = desk.admin_overview();
        assert_eq!(overview.clients, 2);
        assert_eq!(overview.brokers, 0);
    }
}
