use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AppointmentKind, AppointmentStatus};
use crate::error::ValidationError;
use crate::validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_id: String,
    /// Client name copied at scheduling time.
    pub client_name: String,
    pub date: NaiveDate,
    /// Local time, `HH:MM`.
    pub time: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub owner_id: String,
    pub status: AppointmentStatus,
}

/// Input for scheduling an appointment. The client reference is resolved by
/// the caller from the broker's own clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub client_id: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
}

impl CreateAppointment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("clientId", &self.client_id)?;
        validate::clock_time("time", &self.time)
    }
}
