//! Record implementations for desk models.
//!
//! Declares each kind's persisted key and its creation defaults.

use brokerdesk_core::now_rfc3339;

use crate::collection::{OwnedRecord, Record};
use crate::model::*;
use crate::store::keys;

// ── Password helpers ──

/// Hash a plain password with argon2id.
pub fn hash_password(password: &str) -> Result<String, String> {
    use argon2::Argon2;
    use password_hash::rand_core::OsRng;
    use password_hash::{PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

/// Verify a password against an argon2id hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ── Broker roster ──

impl Record for BrokerAccount {
    const KEY: &'static str = keys::USERS;

    fn id(&self) -> &str {
        &self.id
    }
}

// ── Client ──

impl Record for Client {
    const KEY: &'static str = keys::CLIENTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner_id)
    }
}

impl OwnedRecord for Client {
    type Input = CreateClient;

    fn assemble(id: String, owner_id: &str, input: CreateClient) -> Self {
        Client {
            id,
            name: input.name,
            address: input.address,
            email: input.email,
            phone: input.phone,
            plan_type: input.plan_type,
            owner_id: owner_id.to_string(),
            registered_at: now_rfc3339(),
        }
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Appointment ──

impl Record for Appointment {
    const KEY: &'static str = keys::APPOINTMENTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner_id)
    }
}

impl OwnedRecord for Appointment {
    type Input = CreateAppointment;

    fn assemble(id: String, owner_id: &str, input: CreateAppointment) -> Self {
        Appointment {
            id,
            client_id: input.client_id,
            client_name: input.client_name,
            date: input.date,
            time: input.time,
            kind: input.kind,
            owner_id: owner_id.to_string(),
            status: AppointmentStatus::Scheduled,
        }
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Sale ──

impl Record for Sale {
    const KEY: &'static str = keys::SALES;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner_id)
    }
}

impl OwnedRecord for Sale {
    type Input = CreateSale;

    fn assemble(id: String, owner_id: &str, input: CreateSale) -> Self {
        Sale {
            id,
            client_id: input.client_id,
            client_name: input.client_name,
            plan_type: input.plan_type,
            sale_date: input.sale_date,
            amount: input.amount,
            status: input.status,
            owner_id: owner_id.to_string(),
        }
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Quote ──

impl Record for Quote {
    const KEY: &'static str = keys::QUOTES;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner_id)
    }
}

impl OwnedRecord for Quote {
    type Input = CreateQuote;

    fn assemble(id: String, owner_id: &str, input: CreateQuote) -> Self {
        Quote {
            id,
            client_name: input.client_name,
            quote_date: input.quote_date,
            protocol: input.protocol,
            link: input.link,
            amount: input.amount,
            expires_on: input.expires_on,
            status: input.status,
            owner_id: owner_id.to_string(),
        }
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Link ──

impl Record for Link {
    const KEY: &'static str = keys::LINKS;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.owner_id)
    }
}

impl OwnedRecord for Link {
    type Input = CreateLink;

    fn assemble(id: String, owner_id: &str, input: CreateLink) -> Self {
        Link {
            id,
            title: input.title,
            url: input.url,
            owner_id: owner_id.to_string(),
        }
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

// ── Notification ──

impl Record for Notification {
    const KEY: &'static str = keys::NOTIFICATIONS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Notification {
    /// Build an unread notification stamped with the current time.
    pub(crate) fn assemble(id: String, input: CreateNotification) -> Self {
        Notification {
            id,
            title: input.title,
            body: input.body,
            link: input.link,
            created_at: now_rfc3339(),
            read: false,
            target: input.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3nha1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3nha1", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3nha1", "plain-text-not-a-hash"));
    }

    #[test]
    fn appointment_defaults_to_scheduled() {
        let a = Appointment::assemble(
            "a1".into(),
            "7",
            CreateAppointment {
                client_id: "c1".into(),
                client_name: "Maria".into(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                time: "10:30".into(),
                kind: AppointmentKind::DocumentDelivery,
            },
        );
        assert_eq!(a.status, AppointmentStatus::Scheduled);
        assert_eq!(a.owner_id, "7");

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["type"], "document_delivery");
        assert_eq!(json["date"], "2024-05-02");
        assert_eq!(json["status"], "scheduled");
    }

    #[test]
    fn client_gets_registration_timestamp() {
        let c = Client::assemble(
            "c1".into(),
            "7",
            CreateClient {
                name: "Maria".into(),
                address: String::new(),
                email: "maria@x.com".into(),
                phone: String::new(),
                plan_type: PlanType::DentalPlan,
            },
        );
        assert!(chrono::DateTime::parse_from_rfc3339(&c.registered_at).is_ok());
    }

    #[test]
    fn notification_defaults_unread() {
        let n = Notification::assemble(
            "n1".into(),
            CreateNotification {
                title: "t".into(),
                body: "b".into(),
                link: None,
                target: Some("7".into()),
            },
        );
        assert!(!n.read);
        assert_eq!(n.target.as_deref(), Some("7"));
    }
}
