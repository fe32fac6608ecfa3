//! Notification commands.

use anyhow::Result;
use desk::model::{CreateNotification, Notification};
use desk::scope::QueryScope;
use desk::Desk;

use super::{print_rows, svc};
use crate::{NotifyAction, Output};

pub fn run(desk: &mut Desk, action: NotifyAction, output: Output) -> Result<()> {
    match action {
        NotifyAction::List { unread } => {
            let identity = desk.require_login()?;
            let visible: Vec<&Notification> = QueryScope::for_identity(&identity)
                .notifications(&desk.notifications)
                .into_iter()
                .filter(|n| !unread || !n.read)
                .collect();
            print_rows(
                output,
                &["ID", "DATE", "TITLE", "TO", "READ"],
                &visible,
                |n: &Notification| {
                    vec![
                        n.id.clone(),
                        n.created_at.get(..10).unwrap_or(&n.created_at).to_string(),
                        n.title.clone(),
                        n.target.clone().unwrap_or_else(|| "all".to_string()),
                        if n.read { "yes" } else { "no" }.to_string(),
                    ]
                },
            )?;
        }
        NotifyAction::Read { id } => {
            let me = desk.require_broker()?;
            let visible = desk
                .notifications
                .get(&id)
                .is_some_and(|n| n.is_visible_to(&me.id));
            if !visible {
                println!("No notification with id {}.", id);
                return Ok(());
            }
            desk.router().mark_read(&id).map_err(svc)?;
            println!("Marked {} as read.", id);
        }
        NotifyAction::Send {
            to,
            title,
            body,
            link,
        } => {
            desk.require_admin()?;
            if desk.brokers.get(&to).is_none() {
                anyhow::bail!("No broker with id {}.", to);
            }
            let input = CreateNotification {
                title,
                body,
                link,
                target: Some(to),
            };
            input.validate().map_err(svc)?;
            let sent = desk.router().send(input).map_err(svc)?;
            println!("Notification {} sent.", sent.id);
        }
        NotifyAction::Broadcast { title, body, link } => {
            desk.require_admin()?;
            let input = CreateNotification {
                title,
                body,
                link,
                target: None,
            };
            input.validate().map_err(svc)?;
            let sent = desk.router().send(input).map_err(svc)?;
            println!("Notification {} broadcast to all brokers.", sent.id);
        }
    }
    Ok(())
}
