//! NotificationRouter: administrator messages to brokers.

use tracing::info;

use crate::collection::Collection;
use crate::error::StorageError;
use crate::model::{CreateNotification, Notification};
use crate::scope::list_visible_notifications;

pub struct NotificationRouter<'a> {
    notifications: &'a mut Collection<Notification>,
}

impl<'a> NotificationRouter<'a> {
    pub fn new(notifications: &'a mut Collection<Notification>) -> Self {
        Self { notifications }
    }

    /// Store a notification exactly as addressed by `input`.
    pub fn send(&mut self, input: CreateNotification) -> Result<Notification, StorageError> {
        let created = self
            .notifications
            .insert_with(|id| Notification::assemble(id, input))?;
        match &created.target {
            Some(target) => info!("notification {} sent to {}", created.id, target),
            None => info!("notification {} broadcast", created.id),
        }
        Ok(created)
    }

    /// One notification visible to every broker.
    pub fn broadcast(
        &mut self,
        title: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<Notification, StorageError> {
        self.send(CreateNotification {
            title: title.to_string(),
            body: body.to_string(),
            link: link.map(str::to_string),
            target: None,
        })
    }

    /// One notification visible only to `broker_id`.
    pub fn send_to(
        &mut self,
        broker_id: &str,
        title: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<Notification, StorageError> {
        self.send(CreateNotification {
            title: title.to_string(),
            body: body.to_string(),
            link: link.map(str::to_string),
            target: Some(broker_id.to_string()),
        })
    }

    pub fn visible_to(&self, broker_id: &str) -> Vec<&Notification> {
        list_visible_notifications(&*self.notifications, broker_id)
    }

    pub fn unread_count_for(&self, broker_id: &str) -> usize {
        unread_count(&*self.notifications, broker_id)
    }

    /// Set the read flag. Unknown ids are ignored.
    pub fn mark_read(&mut self, notification_id: &str) -> Result<bool, StorageError> {
        self.set_read(notification_id, true)
    }

    /// The only partial update on any collection.
    pub fn set_read(&mut self, notification_id: &str, read: bool) -> Result<bool, StorageError> {
        self.notifications.modify(notification_id, |n| n.read = read)
    }
}

/// Visible notifications for `broker_id` that are still unread.
pub fn unread_count(notifications: &Collection<Notification>, broker_id: &str) -> usize {
    list_visible_notifications(notifications, broker_id)
        .into_iter()
        .filter(|n| !n.read)
        .count()
}
