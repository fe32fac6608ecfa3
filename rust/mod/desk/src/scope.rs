//! QueryScope: owner-filtered views over collections.
//!
//! This is the only access control in the system. It narrows what a
//! consumer asks for; it does not guard storage. Any caller holding a
//! `Collection` can still read every record through `list_all` or
//! `Collection::records`, and the persisted arrays carry no per-record
//! permissions.

use crate::collection::{Collection, OwnedRecord, Record};
use crate::model::{
    Appointment, BrokerAccount, Client, Identity, Link, Notification, Quote, Role, Sale,
};

/// Records owned by `broker_id`, in insertion order.
pub fn list_owned_by<'a, T: OwnedRecord>(collection: &'a Collection<T>, broker_id: &str) -> Vec<&'a T> {
    collection
        .records()
        .iter()
        .filter(|r| r.owner_id() == broker_id)
        .collect()
}

/// Broadcast notifications plus those targeted at `broker_id`.
pub fn list_visible_notifications<'a>(
    notifications: &'a Collection<Notification>,
    broker_id: &str,
) -> Vec<&'a Notification> {
    notifications
        .records()
        .iter()
        .filter(|n| n.is_visible_to(broker_id))
        .collect()
}

/// The unfiltered collection. Used by administrator views.
pub fn list_all<T: Record>(collection: &Collection<T>) -> &[T] {
    collection.records()
}

/// A view derived from the active identity: brokers see their own records,
/// the administrator sees everything.
#[derive(Debug, Clone, Copy)]
pub struct QueryScope<'i> {
    identity: &'i Identity,
}

impl<'i> QueryScope<'i> {
    pub fn for_identity(identity: &'i Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        self.identity
    }

    pub fn records<'a, T: OwnedRecord>(&self, collection: &'a Collection<T>) -> Vec<&'a T> {
        match self.identity.role {
            Role::Admin => list_all(collection).iter().collect(),
            Role::Broker => list_owned_by(collection, &self.identity.id),
        }
    }

    pub fn notifications<'a>(&self, notifications: &'a Collection<Notification>) -> Vec<&'a Notification> {
        match self.identity.role {
            Role::Admin => list_all(notifications).iter().collect(),
            Role::Broker => list_visible_notifications(notifications, &self.identity.id),
        }
    }

    /// Look up one record by id, but only if this scope can see it.
    pub fn find<'a, T: OwnedRecord>(&self, collection: &'a Collection<T>, id: &str) -> Option<&'a T> {
        collection.get(id).filter(|r| match self.identity.role {
            Role::Admin => true,
            Role::Broker => r.owner_id() == self.identity.id,
        })
    }
}

/// Free-text matching as offered by each listing screen.
pub trait TextMatch {
    /// `needle` is already lowercased.
    fn matches_text(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl TextMatch for BrokerAccount {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(&self.email, needle)
    }
}

impl TextMatch for Client {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(&self.email, needle)
    }
}

impl TextMatch for Appointment {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.client_name, needle)
            || contains(self.kind.label(), needle)
            || self.kind.as_str().contains(needle)
    }
}

impl TextMatch for Sale {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.client_name, needle)
            || contains(self.plan_type.label(), needle)
            || self.plan_type.as_str().contains(needle)
    }
}

impl TextMatch for Quote {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.client_name, needle) || contains(&self.protocol, needle)
    }
}

impl TextMatch for Link {
    fn matches_text(&self, needle: &str) -> bool {
        contains(&self.title, needle)
    }
}

/// Keep the records matching `term`, case-insensitively. An empty term keeps all.
pub fn search<'a, T: TextMatch + 'a>(records: impl IntoIterator<Item = &'a T>, term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    records
        .into_iter()
        .filter(|r| needle.is_empty() || r.matches_text(&needle))
        .collect()
}
