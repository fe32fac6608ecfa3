//! Broker roster: registration, profile edits and credential management.

use brokerdesk_core::merge_patch;
use tracing::info;

use crate::collection::Collection;
use crate::error::{RosterError, StorageError, ValidationError};
use crate::model::{BrokerAccount, CreateBroker, Role, PROFILE_FIELDS};
use crate::scope::search;
use crate::store::keys;
use crate::store_impls::{hash_password, verify_password};
use crate::validate;

pub struct Roster<'a> {
    brokers: &'a mut Collection<BrokerAccount>,
}

impl<'a> Roster<'a> {
    pub fn new(brokers: &'a mut Collection<BrokerAccount>) -> Self {
        Self { brokers }
    }

    /// Register a broker. Used both for self-registration and by the
    /// administrator. Rejects an email that is already on the roster.
    pub fn register(&mut self, input: CreateBroker) -> Result<BrokerAccount, RosterError> {
        input.validate()?;
        if self.find_by_email(&input.email).is_some() {
            return Err(RosterError::EmailTaken(input.email));
        }
        let password_hash = hash_password(&input.password).map_err(RosterError::Hash)?;

        let account = self.brokers.insert_with(|id| BrokerAccount {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            registry_number: input.registry_number,
            photo: input.photo,
            password_hash,
            role: Role::Broker,
        })?;
        info!("registered broker {} ({})", account.email, account.id);
        Ok(account)
    }

    pub fn list(&self) -> &[BrokerAccount] {
        self.brokers.records()
    }

    pub fn get(&self, id: &str) -> Option<&BrokerAccount> {
        self.brokers.get(id)
    }

    /// First roster entry with this exact email.
    pub fn find_by_email(&self, email: &str) -> Option<&BrokerAccount> {
        self.brokers.records().iter().find(|a| a.email == email)
    }

    /// Case-insensitive substring match over name and email.
    pub fn search(&self, term: &str) -> Vec<&BrokerAccount> {
        search(self.brokers.records(), term)
    }

    /// Apply a JSON merge-patch to the profile fields of a broker.
    ///
    /// Keys outside the profile (id, role, credential) are ignored. The email
    /// is re-validated but not re-checked for uniqueness.
    pub fn update_profile(
        &mut self,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<BrokerAccount, RosterError> {
        let current = self
            .brokers
            .get(id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))?;

        let mut base = serde_json::to_value(current).map_err(|source| StorageError::Encode {
            key: keys::USERS.to_string(),
            source,
        })?;

        let mut filtered = serde_json::Map::new();
        if let Some(obj) = patch.as_object() {
            for (key, value) in obj {
                if PROFILE_FIELDS.contains(&key.as_str()) {
                    filtered.insert(key.clone(), value.clone());
                }
            }
        }
        merge_patch(&mut base, &serde_json::Value::Object(filtered));

        let updated: BrokerAccount = serde_json::from_value(base)
            .map_err(|e| ValidationError::new("profile", e.to_string()))?;
        validate::non_empty("name", &updated.name)?;
        validate::email("email", &updated.email)?;
        validate::optional_url("photo", updated.photo.as_deref())?;

        self.brokers.replace(updated.clone())?;
        info!("updated profile of broker {}", id);
        Ok(updated)
    }

    /// Change a password after verifying the current one.
    pub fn change_password(
        &mut self,
        id: &str,
        current: &str,
        new_password: &str,
    ) -> Result<(), RosterError> {
        let account = self
            .brokers
            .get(id)
            .ok_or_else(|| RosterError::NotFound(id.to_string()))?;
        if !verify_password(current, &account.password_hash) {
            return Err(RosterError::WrongPassword);
        }
        self.store_password(id, new_password)
    }

    /// Administrator reset; the current password is not required.
    pub fn reset_password(&mut self, id: &str, new_password: &str) -> Result<(), RosterError> {
        if self.brokers.get(id).is_none() {
            return Err(RosterError::NotFound(id.to_string()));
        }
        self.store_password(id, new_password)
    }

    fn store_password(&mut self, id: &str, new_password: &str) -> Result<(), RosterError> {
        validate::password("password", new_password)?;
        let hash = hash_password(new_password).map_err(RosterError::Hash)?;
        self.brokers.modify(id, |a| a.password_hash = hash)?;
        info!("password changed for broker {}", id);
        Ok(())
    }

    /// Remove a broker from the roster. Records they own stay where they are.
    pub fn remove(&mut self, id: &str) -> Result<bool, RosterError> {
        let removed = self.brokers.delete_by_id(id)?;
        if removed {
            info!("removed broker {}", id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brokerdesk_kv::MemoryKV;
    use serde_json::json;

    use super::*;
    use crate::store::RecordStore;

    fn open() -> Collection<BrokerAccount> {
        Collection::open(RecordStore::new(Arc::new(MemoryKV::new()))).unwrap()
    }

    fn input(name: &str, email: &str) -> CreateBroker {
        CreateBroker {
            name: name.into(),
            email: email.into(),
            phone: "21 99999-0000".into(),
            address: String::new(),
            registry_number: None,
            photo: None,
            password: "s3nha1".into(),
        }
    }

    #[test]
    fn register_hashes_and_rejects_duplicate_email() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);

        let ana = roster.register(input("Ana", "ana@x.com")).unwrap();
        assert_ne!(ana.password_hash, "s3nha1");
        assert!(verify_password("s3nha1", &ana.password_hash));

        let err = roster.register(input("Other Ana", "ana@x.com")).unwrap_err();
        assert!(matches!(err, RosterError::EmailTaken(_)));
        assert_eq!(roster.list().len(), 1);
    }

    #[test]
    fn register_validates_input() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);
        let mut bad = input("Ana", "ana@x.com");
        bad.password = "123".into();
        assert!(matches!(roster.register(bad), Err(RosterError::Invalid(_))));
        assert!(roster.list().is_empty());
    }

    #[test]
    fn update_profile_touches_profile_fields_only() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);
        let ana = roster.register(input("Ana", "ana@x.com")).unwrap();

        let updated = roster
            .update_profile(
                &ana.id,
                &json!({
                    "name": "Ana Paula",
                    "registryNumber": "SUSEP-1",
                    "phone": null,
                    "id": "hijack",
                    "role": "admin",
                    "passwordHash": "x"
                }),
            )
            .unwrap();

        assert_eq!(updated.id, ana.id);
        assert_eq!(updated.name, "Ana Paula");
        assert_eq!(updated.registry_number.as_deref(), Some("SUSEP-1"));
        assert_eq!(updated.phone, "");
        assert_eq!(updated.role, Role::Broker);
        assert_eq!(updated.password_hash, ana.password_hash);
        assert_eq!(roster.get(&ana.id), Some(&updated));
    }

    #[test]
    fn update_profile_rejects_bad_email_and_unknown_id() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);
        let ana = roster.register(input("Ana", "ana@x.com")).unwrap();

        let err = roster.update_profile(&ana.id, &json!({"email": "nope"})).unwrap_err();
        assert!(matches!(err, RosterError::Invalid(_)));
        assert_eq!(roster.get(&ana.id).map(|a| a.email.as_str()), Some("ana@x.com"));

        let err = roster.update_profile("ghost", &json!({"name": "x"})).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
    }

    #[test]
    fn change_and_reset_password() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);
        let ana = roster.register(input("Ana", "ana@x.com")).unwrap();

        let err = roster.change_password(&ana.id, "wrong", "novaSenha").unwrap_err();
        assert!(matches!(err, RosterError::WrongPassword));

        roster.change_password(&ana.id, "s3nha1", "novaSenha").unwrap();
        let hash = &roster.get(&ana.id).unwrap().password_hash;
        assert!(verify_password("novaSenha", hash));

        roster.reset_password(&ana.id, "reset1").unwrap();
        let hash = &roster.get(&ana.id).unwrap().password_hash;
        assert!(verify_password("reset1", hash));

        assert!(matches!(
            roster.reset_password(&ana.id, "123"),
            Err(RosterError::Invalid(_))
        ));
        assert!(matches!(
            roster.reset_password("ghost", "reset1"),
            Err(RosterError::NotFound(_))
        ));
    }

    #[test]
    fn search_and_remove() {
        let mut brokers = open();
        let mut roster = Roster::new(&mut brokers);
        let ana = roster.register(input("Ana Souza", "ana@x.com")).unwrap();
        roster.register(input("Bruno", "bruno@corretora.com")).unwrap();

        assert_eq!(roster.search("SOUZA").len(), 1);
        assert_eq!(roster.search("corretora").len(), 1);
        assert_eq!(roster.search("").len(), 2);

        assert!(roster.remove(&ana.id).unwrap());
        assert!(!roster.remove(&ana.id).unwrap());
        assert_eq!(roster.list().len(), 1);
    }
}
