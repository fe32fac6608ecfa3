//! Roster administration and self-service profile commands.

use anyhow::Result;
use desk::model::Identity;
use desk::scope::search;
use desk::Desk;

use super::session::broker_input;
use super::{confirm, new_password, parse_json, print_json, print_rows, svc};
use crate::{BrokerAction, Output, ProfileAction};

pub fn run(desk: &mut Desk, action: BrokerAction, output: Output) -> Result<()> {
    desk.require_admin()?;

    match action {
        BrokerAction::List(args) => {
            // Identities carry no credential.
            let identities: Vec<Identity> =
                search(desk.brokers.records(), args.search.as_deref().unwrap_or(""))
                    .into_iter()
                    .map(|b| b.identity())
                    .collect();
            let rows: Vec<&Identity> = identities.iter().collect();
            print_rows(
                output,
                &["ID", "NAME", "EMAIL", "PHONE", "REGISTRY"],
                &rows,
                |b: &Identity| {
                    vec![
                        b.id.clone(),
                        b.name.clone(),
                        b.email.clone(),
                        b.phone.clone().unwrap_or_default(),
                        b.registry_number.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        BrokerAction::Add(args) => {
            let input = broker_input(args)?;
            let account = desk.roster().register(input).map_err(svc)?;
            println!("Broker {} added ({}).", account.email, account.id);
        }
        BrokerAction::Update { id, json_body } => {
            let patch = parse_json(&json_body)?;
            let updated = desk.update_profile(&id, &patch)?;
            println!("Broker {} updated.", updated.email);
            if output == Output::Json {
                print_json(&updated.identity())?;
            }
        }
        BrokerAction::ResetPassword { id, password } => {
            let password = new_password(password)?;
            desk.roster().reset_password(&id, &password).map_err(svc)?;
            println!("Password reset for {}.", id);
        }
        BrokerAction::Remove { id, yes } => {
            if !yes && !confirm(&format!("Remove broker {}? Their records are kept.", id))? {
                println!("Cancelled.");
                return Ok(());
            }
            if desk.roster().remove(&id).map_err(svc)? {
                println!("Broker {} removed.", id);
            } else {
                println!("No broker with id {}.", id);
            }
        }
    }
    Ok(())
}

pub fn profile(desk: &mut Desk, action: ProfileAction, output: Output) -> Result<()> {
    let me = desk.require_broker()?;

    match action {
        ProfileAction::Show => match output {
            Output::Json => print_json(&me)?,
            Output::Table => {
                println!("name:     {}", me.name);
                println!("email:    {}", me.email);
                println!("phone:    {}", me.phone.as_deref().unwrap_or("-"));
                println!("address:  {}", me.address.as_deref().unwrap_or("-"));
                println!("registry: {}", me.registry_number.as_deref().unwrap_or("-"));
                println!("photo:    {}", me.photo.as_deref().unwrap_or("-"));
            }
        },
        ProfileAction::Update { json_body } => {
            let patch = parse_json(&json_body)?;
            let updated = desk.update_profile(&me.id, &patch)?;
            println!("Profile updated.");
            if output == Output::Json {
                print_json(&updated.identity())?;
            }
        }
        ProfileAction::Passwd => {
            let current = rpassword::prompt_password("Current password: ")?;
            let new = new_password(None)?;
            desk.roster()
                .change_password(&me.id, &current, &new)
                .map_err(svc)?;
            println!("Password changed.");
        }
    }
    Ok(())
}
