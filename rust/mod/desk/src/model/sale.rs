use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PlanType, SaleStatus};
use crate::error::ValidationError;
use crate::validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub plan_type: PlanType,
    pub sale_date: NaiveDate,
    pub amount: f64,
    pub status: SaleStatus,
    pub owner_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    pub client_id: String,
    pub client_name: String,
    pub plan_type: PlanType,
    pub sale_date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub status: SaleStatus,
}

impl CreateSale {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("clientId", &self.client_id)?;
        validate::amount("amount", self.amount)
    }
}
