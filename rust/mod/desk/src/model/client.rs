use serde::{Deserialize, Serialize};

use super::PlanType;
use crate::error::ValidationError;
use crate::validate;

/// A broker's client. Immutable once created, except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub plan_type: PlanType,
    /// Broker that created the client.
    pub owner_id: String,
    /// RFC 3339 registration timestamp.
    pub registered_at: String,
}

/// Input for creating a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub plan_type: PlanType,
}

impl CreateClient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("name", &self.name)?;
        validate::email("email", &self.email)
    }
}
