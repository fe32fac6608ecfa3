//! Login, logout, whoami and self-registration.

use anyhow::Result;
use desk::model::CreateBroker;
use desk::Desk;

use super::{new_password, print_json, prompt_line, svc};
use crate::{BrokerArgs, Output};

pub fn login(desk: &mut Desk, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => prompt_line("Email: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };

    let identity = desk.login(&email, &password).map_err(svc)?;
    println!("Logged in as {} ({}).", identity.name, identity.role);
    Ok(())
}

pub fn logout(desk: &mut Desk) -> Result<()> {
    if desk.current().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    desk.logout().map_err(svc)?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(desk: &Desk, output: Output) -> Result<()> {
    let identity = desk.require_login()?;
    match output {
        Output::Json => print_json(&identity)?,
        Output::Table => {
            println!("{} <{}>", identity.name, identity.email);
            println!("id:   {}", identity.id);
            println!("role: {}", identity.role);
            if let Some(reg) = &identity.registry_number {
                println!("registry: {}", reg);
            }
        }
    }
    Ok(())
}

/// Turn CLI arguments into roster input, prompting for the password if needed.
pub fn broker_input(args: BrokerArgs) -> Result<CreateBroker> {
    Ok(CreateBroker {
        password: new_password(args.password)?,
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        registry_number: args.registry_number,
        photo: args.photo,
    })
}

pub fn register(desk: &mut Desk, args: BrokerArgs) -> Result<()> {
    let input = broker_input(args)?;
    let account = desk.roster().register(input).map_err(svc)?;
    println!("Registered {} ({}). You can now log in.", account.email, account.id);
    Ok(())
}
