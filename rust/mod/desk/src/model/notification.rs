use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate;

/// A message from the administrator.
///
/// `target` absent means broadcast; present means exactly one broker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Notification {
    pub fn is_broadcast(&self) -> bool {
        self.target.is_none()
    }

    /// Whether `broker_id` should see this notification.
    pub fn is_visible_to(&self, broker_id: &str) -> bool {
        match &self.target {
            None => true,
            Some(target) => target == broker_id,
        }
    }
}

/// Addressing wire shape: `{title, body, link?, target?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateNotification {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CreateNotification {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("title", &self.title)?;
        validate::non_empty("body", &self.body)?;
        validate::optional_url("link", self.link.as_deref())?;
        if let Some(target) = &self.target {
            validate::non_empty("target", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_wire_shape_has_no_target_key() {
        let input = CreateNotification {
            title: "Maintenance".into(),
            body: "Tonight at 22h".into(),
            link: None,
            target: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Maintenance", "body": "Tonight at 22h"}));

        let back: CreateNotification = serde_json::from_value(json).unwrap();
        assert!(back.target.is_none());
    }

    #[test]
    fn visibility_rules() {
        let mut n = Notification {
            id: "n1".into(),
            title: "t".into(),
            body: "b".into(),
            link: None,
            created_at: "2024-01-01T00:00:00Z".into(),
            read: false,
            target: None,
        };
        assert!(n.is_broadcast());
        assert!(n.is_visible_to("7"));
        assert!(n.is_visible_to("9"));

        n.target = Some("7".into());
        assert!(!n.is_broadcast());
        assert!(n.is_visible_to("7"));
        assert!(!n.is_visible_to("9"));
    }

    #[test]
    fn empty_target_rejected() {
        let input = CreateNotification {
            title: "t".into(),
            body: "b".into(),
            link: None,
            target: Some(String::new()),
        };
        assert_eq!(input.validate().unwrap_err().field, "target");
    }
}
