use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate;

/// A bookmarked URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLink {
    pub title: String,
    pub url: String,
}

impl CreateLink {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("title", &self.title)?;
        validate::web_url("url", &self.url)
    }
}
