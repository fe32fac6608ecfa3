//! Client, appointment, sale, quote and link commands.
//!
//! Listing goes through the session's query scope: a broker sees their own
//! records, the administrator sees everyone's. Creation requires a broker.

use anyhow::Result;
use chrono::Local;
use desk::collection::{Collection, OwnedRecord};
use desk::model::*;
use desk::scope::{search, QueryScope, TextMatch};
use desk::Desk;

use super::{print_rows, svc};
use crate::{AppointmentAction, ClientAction, LinkAction, ListArgs, Output, QuoteAction, SaleAction};

fn list<T>(
    desk: &Desk,
    collection: &Collection<T>,
    args: ListArgs,
    output: Output,
    header: &[&str],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<()>
where
    T: OwnedRecord + TextMatch,
{
    let identity = desk.require_login()?;
    let scope = QueryScope::for_identity(&identity);
    let visible = scope.records(collection);
    let hits = search(visible, args.search.as_deref().unwrap_or(""));
    print_rows(output, header, &hits, row)
}

/// Delete a record the current broker owns. Unknown ids are reported, not errors.
fn delete<T: OwnedRecord>(
    me: &Identity,
    collection: &mut Collection<T>,
    id: &str,
    what: &str,
) -> Result<()> {
    if collection.get(id).map(|r| r.owner_id() == me.id) != Some(true) {
        println!("No {} with id {}.", what, id);
        return Ok(());
    }
    collection.delete_by_id(id).map_err(svc)?;
    println!("{} {} deleted.", what, id);
    Ok(())
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn client(desk: &mut Desk, action: ClientAction, output: Output) -> Result<()> {
    match action {
        ClientAction::Add {
            name,
            email,
            address,
            phone,
            plan,
        } => {
            let me = desk.require_broker()?;
            let input = CreateClient {
                name,
                address,
                email,
                phone,
                plan_type: plan,
            };
            input.validate().map_err(svc)?;
            let created = desk.clients.create(input, &me.id).map_err(svc)?;
            println!("Client {} created ({}).", created.name, created.id);
        }
        ClientAction::List(args) => list(
            desk,
            &desk.clients,
            args,
            output,
            &["ID", "NAME", "EMAIL", "PHONE", "PLAN"],
            |c: &Client| {
                vec![
                    c.id.clone(),
                    c.name.clone(),
                    c.email.clone(),
                    c.phone.clone(),
                    c.plan_type.label().to_string(),
                ]
            },
        )?,
        ClientAction::Delete { id } => {
            let me = desk.require_broker()?;
            delete(&me, &mut desk.clients, &id, "client")?;
        }
    }
    Ok(())
}

pub fn appointment(desk: &mut Desk, action: AppointmentAction, output: Output) -> Result<()> {
    match action {
        AppointmentAction::Add {
            client,
            date,
            time,
            kind,
        } => {
            let me = desk.require_broker()?;
            let Some(owned) = desk.clients.get(&client).filter(|c| c.owner_id == me.id) else {
                anyhow::bail!("No client with id {}.", client);
            };
            let input = CreateAppointment {
                client_id: owned.id.clone(),
                client_name: owned.name.clone(),
                date,
                time,
                kind,
            };
            input.validate().map_err(svc)?;
            let created = desk.appointments.create(input, &me.id).map_err(svc)?;
            println!(
                "Appointment {} scheduled for {} at {}.",
                created.id, created.date, created.time
            );
        }
        AppointmentAction::List(args) => list(
            desk,
            &desk.appointments,
            args,
            output,
            &["ID", "DATE", "TIME", "CLIENT", "TYPE", "STATUS"],
            |a: &Appointment| {
                vec![
                    a.id.clone(),
                    a.date.to_string(),
                    a.time.clone(),
                    a.client_name.clone(),
                    a.kind.label().to_string(),
                    a.status.label().to_string(),
                ]
            },
        )?,
        AppointmentAction::Delete { id } => {
            let me = desk.require_broker()?;
            delete(&me, &mut desk.appointments, &id, "appointment")?;
        }
    }
    Ok(())
}

pub fn sale(desk: &mut Desk, action: SaleAction, output: Output) -> Result<()> {
    match action {
        SaleAction::Add {
            client,
            plan,
            date,
            amount,
            status,
        } => {
            let me = desk.require_broker()?;
            let Some(owned) = desk.clients.get(&client).filter(|c| c.owner_id == me.id) else {
                anyhow::bail!("No client with id {}.", client);
            };
            let input = CreateSale {
                client_id: owned.id.clone(),
                client_name: owned.name.clone(),
                plan_type: plan.unwrap_or(owned.plan_type),
                sale_date: date.unwrap_or_else(|| Local::now().date_naive()),
                amount,
                status,
            };
            input.validate().map_err(svc)?;
            let created = desk.sales.create(input, &me.id).map_err(svc)?;
            println!("Sale {} recorded ({}).", created.id, money(created.amount));
        }
        SaleAction::List(args) => list(
            desk,
            &desk.sales,
            args,
            output,
            &["ID", "DATE", "CLIENT", "PLAN", "AMOUNT", "STATUS"],
            |s: &Sale| {
                vec![
                    s.id.clone(),
                    s.sale_date.to_string(),
                    s.client_name.clone(),
                    s.plan_type.label().to_string(),
                    money(s.amount),
                    s.status.label().to_string(),
                ]
            },
        )?,
        SaleAction::Delete { id } => {
            let me = desk.require_broker()?;
            delete(&me, &mut desk.sales, &id, "sale")?;
        }
    }
    Ok(())
}

pub fn quote(desk: &mut Desk, action: QuoteAction, output: Output) -> Result<()> {
    match action {
        QuoteAction::Add {
            client_name,
            protocol,
            date,
            expires,
            amount,
            link,
            status,
        } => {
            let me = desk.require_broker()?;
            let input = CreateQuote {
                client_name,
                quote_date: date.unwrap_or_else(|| Local::now().date_naive()),
                protocol,
                link,
                amount,
                expires_on: expires,
                status,
            };
            input.validate().map_err(svc)?;
            let created = desk.quotes.create(input, &me.id).map_err(svc)?;
            println!("Quote {} saved (protocol {}).", created.id, created.protocol);
        }
        QuoteAction::List(args) => list(
            desk,
            &desk.quotes,
            args,
            output,
            &["ID", "DATE", "CLIENT", "PROTOCOL", "AMOUNT", "EXPIRES", "STATUS"],
            |q: &Quote| {
                vec![
                    q.id.clone(),
                    q.quote_date.to_string(),
                    q.client_name.clone(),
                    q.protocol.clone(),
                    money(q.amount),
                    q.expires_on.to_string(),
                    q.status.label().to_string(),
                ]
            },
        )?,
        QuoteAction::Delete { id } => {
            let me = desk.require_broker()?;
            delete(&me, &mut desk.quotes, &id, "quote")?;
        }
    }
    Ok(())
}

pub fn link(desk: &mut Desk, action: LinkAction, output: Output) -> Result<()> {
    match action {
        LinkAction::Add { title, url } => {
            let me = desk.require_broker()?;
            let input = CreateLink { title, url };
            input.validate().map_err(svc)?;
            let created = desk.links.create(input, &me.id).map_err(svc)?;
            println!("Link {} saved ({}).", created.title, created.id);
        }
        LinkAction::List(args) => list(
            desk,
            &desk.links,
            args,
            output,
            &["ID", "TITLE", "URL"],
            |l: &Link| vec![l.id.clone(), l.title.clone(), l.url.clone()],
        )?,
        LinkAction::Delete { id } => {
            let me = desk.require_broker()?;
            delete(&me, &mut desk.links, &id, "link")?;
        }
    }
    Ok(())
}
