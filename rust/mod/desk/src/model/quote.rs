use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::QuoteStatus;
use crate::error::ValidationError;
use crate::validate;

/// A price quote. Unlike sales, the client is free text, not a reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub client_name: String,
    pub quote_date: NaiveDate,
    /// Insurer protocol number.
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub amount: f64,
    pub expires_on: NaiveDate,
    pub status: QuoteStatus,
    pub owner_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuote {
    pub client_name: String,
    pub quote_date: NaiveDate,
    pub protocol: String,
    #[serde(default)]
    pub link: Option<String>,
    pub amount: f64,
    pub expires_on: NaiveDate,
    #[serde(default)]
    pub status: QuoteStatus,
}

impl CreateQuote {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("clientName", &self.client_name)?;
        validate::non_empty("protocol", &self.protocol)?;
        validate::optional_url("link", self.link.as_deref())?;
        validate::amount("amount", self.amount)?;
        if self.expires_on < self.quote_date {
            return Err(ValidationError::new(
                "expiresOn",
                "must not be before the quote date",
            ));
        }
        Ok(())
    }
}
