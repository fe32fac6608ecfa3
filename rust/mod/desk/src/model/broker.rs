use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate;

/// Role tag carried by every identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Broker,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Broker => f.write_str("broker"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// A broker on the roster. This is the only record that carries a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrokerAccount {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    pub name: String,

    /// Login key. Uniqueness is checked on registration only.
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    /// Professional registry number, if the broker has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_number: Option<String>,

    /// Photo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// argon2id PHC string.
    pub password_hash: String,

    /// Always `Role::Broker`; kept on the record so the roster is self-describing.
    #[serde(default = "broker_role")]
    pub role: Role,
}

fn broker_role() -> Role {
    Role::Broker
}

impl BrokerAccount {
    /// Identity with the credential stripped, as stored for session restore.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: Role::Broker,
            phone: Some(self.phone.clone()).filter(|p| !p.is_empty()),
            address: Some(self.address.clone()).filter(|a| !a.is_empty()),
            registry_number: self.registry_number.clone(),
            photo: self.photo.clone(),
        }
    }
}

/// Who is logged in. Never contains a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Input for registering a broker (self-registration or admin add).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBroker {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub registry_number: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Plain password; hashed before it reaches storage.
    pub password: String,
}

impl CreateBroker {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("name", &self.name)?;
        validate::email("email", &self.email)?;
        validate::optional_url("photo", self.photo.as_deref())?;
        validate::password("password", &self.password)
    }
}

/// Profile fields a broker may change with a merge patch.
pub const PROFILE_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "address",
    "registryNumber",
    "photo",
];
