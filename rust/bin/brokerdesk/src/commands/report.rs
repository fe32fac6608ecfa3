//! Reports and dashboard statistics.

use anyhow::Result;
use desk::report::{brokers_csv, sales_csv, SalesFilter, SalesReport, Tally};
use desk::scope::QueryScope;
use desk::Desk;

use super::print_json;
use crate::{Output, ReportAction};

fn tally_line(label: &str, t: &Tally) -> String {
    format!("{:<22} {:>5}  {:>12.2}", label, t.count, t.amount)
}

pub fn run(desk: &Desk, action: ReportAction, output: Output) -> Result<()> {
    match action {
        ReportAction::Sales {
            from,
            to,
            plan,
            client,
            csv,
        } => {
            let identity = desk.require_login()?;
            let filter = SalesFilter {
                from,
                to,
                plan_type: plan,
                client,
            };
            let visible = QueryScope::for_identity(&identity).records(&desk.sales);
            let matching = filter.apply(visible);

            if csv {
                println!("{}", sales_csv(matching));
                return Ok(());
            }

            let report = SalesReport::build(matching);
            match output {
                Output::Json => print_json(&report)?,
                Output::Table => {
                    println!("{}", tally_line("Total", &report.total));
                    println!();
                    for (plan, t) in &report.by_plan_type {
                        println!("{}", tally_line(plan.label(), t));
                    }
                    println!();
                    for (status, t) in &report.by_status {
                        println!("{}", tally_line(status.label(), t));
                    }
                }
            }
        }
        ReportAction::Brokers { csv } => {
            desk.require_admin()?;
            let summaries = desk.broker_summaries();
            if csv {
                println!("{}", brokers_csv(&summaries));
            } else if output == Output::Json {
                print_json(&summaries)?;
            } else {
                for s in &summaries {
                    println!(
                        "{:<24} {:<28} clients {:>4}  appts {:>4}  {}",
                        s.name,
                        s.email,
                        s.clients,
                        s.appointments,
                        tally_line("sales", &s.sales)
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn stats(desk: &Desk, output: Output) -> Result<()> {
    let identity = desk.require_login()?;

    if identity.is_admin() {
        let overview = desk.admin_overview();
        match output {
            Output::Json => print_json(&overview)?,
            Output::Table => {
                println!("brokers: {}", overview.brokers);
                println!("clients: {}", overview.clients);
                println!("{}", tally_line("sales", &overview.sales));
            }
        }
        return Ok(());
    }

    let dash = desk.broker_dashboard(&identity.id);
    match output {
        Output::Json => print_json(&dash)?,
        Output::Table => {
            println!("clients:       {}", dash.clients);
            println!("appointments:  {}", dash.appointments);
            println!("quotes:        {}", dash.quotes);
            println!("unread:        {}", dash.unread_notifications);
            println!("{}", tally_line("sales", &dash.sales));
        }
    }
    Ok(())
}
