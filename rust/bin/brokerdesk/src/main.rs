//! `brokerdesk`: command-line workspace for insurance brokers.
//!
//! Every invocation opens the local database, restores the persisted
//! session, runs one command and exits.

mod commands;

use std::path::PathBuf;

use brokerdesk_core::{DeskConfig, ServiceError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use desk::model::{AppointmentKind, PlanType, QuoteStatus, SaleStatus};

/// BrokerDesk CLI.
#[derive(Parser, Debug)]
#[command(name = "brokerdesk", about = "Broker client, sales and appointment desk")]
struct Cli {
    /// Path to config file (default: ~/.brokerdesk/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Table)]
    output: Output,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in as a broker or the administrator.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (prefer the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the persisted session.
    Logout,

    /// Show the logged-in identity.
    Whoami,

    /// Register a new broker account.
    Register(BrokerArgs),

    /// Manage clients.
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Manage appointments.
    Appointment {
        #[command(subcommand)]
        action: AppointmentAction,
    },

    /// Manage sales.
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },

    /// Manage quotes.
    Quote {
        #[command(subcommand)]
        action: QuoteAction,
    },

    /// Manage saved links.
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Read or send notifications.
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },

    /// Administrator: manage the broker roster.
    Broker {
        #[command(subcommand)]
        action: BrokerAction,
    },

    /// Show or edit your own profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Sales and broker reports.
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Dashboard figures for the logged-in identity.
    Stats,

    /// Print an argon2id hash for `[admin] password_hash` in the config file.
    HashPassword,

    /// Show version.
    Version,
}

#[derive(clap::Args, Debug)]
pub struct BrokerArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long)]
    pub registry_number: Option<String>,
    /// Photo URL.
    #[arg(long)]
    pub photo: Option<String>,
    /// Password (prompted if omitted).
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text filter.
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ClientAction {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Plan type (e.g. health_plan, "Dental plan").
        #[arg(long)]
        plan: PlanType,
    },
    List(ListArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AppointmentAction {
    Add {
        /// Client id.
        #[arg(long)]
        client: String,
        /// Date (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Time (HH:MM).
        #[arg(long)]
        time: String,
        #[arg(long = "type")]
        kind: AppointmentKind,
    },
    List(ListArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SaleAction {
    Add {
        /// Client id.
        #[arg(long)]
        client: String,
        /// Plan type (defaults to the client's plan).
        #[arg(long)]
        plan: Option<PlanType>,
        /// Sale date (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "pending")]
        status: SaleStatus,
    },
    List(ListArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum QuoteAction {
    Add {
        #[arg(long)]
        client_name: String,
        #[arg(long)]
        protocol: String,
        /// Quote date (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        expires: NaiveDate,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        link: Option<String>,
        #[arg(long, default_value = "pending")]
        status: QuoteStatus,
    },
    List(ListArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum LinkAction {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
    },
    List(ListArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum NotifyAction {
    /// List notifications visible to you.
    List {
        /// Only unread ones.
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification as read.
    Read { id: String },
    /// Administrator: send to one broker.
    Send {
        /// Target broker id.
        #[arg(long)]
        to: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        link: Option<String>,
    },
    /// Administrator: send to every broker.
    Broadcast {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        link: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BrokerAction {
    List(ListArgs),
    Add(BrokerArgs),
    /// Apply a JSON merge-patch to a broker's profile.
    Update {
        id: String,
        #[arg(long = "json")]
        json_body: String,
    },
    /// Set a new password without the current one.
    ResetPassword {
        id: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove from the roster. Owned records are kept.
    Remove {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    /// Apply a JSON merge-patch, e.g. '{"phone": "21 99999-0000"}'.
    Update {
        #[arg(long = "json")]
        json_body: String,
    },
    /// Change your password.
    Passwd,
}

#[derive(Subcommand, Debug)]
pub enum ReportAction {
    /// Sales totals, optionally filtered.
    Sales {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long)]
        plan: Option<PlanType>,
        /// Client name substring.
        #[arg(long)]
        client: Option<String>,
        /// Print the matching sales as CSV instead of totals.
        #[arg(long)]
        csv: bool,
    },
    /// Administrator: per-broker summary.
    Brokers {
        #[arg(long)]
        csv: bool,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = cli.output;

    if let Err(e) = run(cli) {
        let service = e.downcast_ref::<ServiceError>();
        match service {
            Some(err) if output == Output::Json => eprintln!("{}", err.to_json()),
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(service.map(ServiceError::exit_code).unwrap_or(1));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.unwrap_or_else(DeskConfig::default_path);
    let mut config = DeskConfig::load(&config_path)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let output = cli.output;

    match cli.command {
        Commands::Version => {
            println!("brokerdesk v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::HashPassword => {
            let password = commands::new_password(None)?;
            println!("{}", desk::store_impls::hash_password(&password).map_err(anyhow::Error::msg)?);
            return Ok(());
        }
        _ => {}
    }

    let mut desk = commands::open_desk(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&mut desk, email, password)?;
        }
        Commands::Logout => commands::session::logout(&mut desk)?,
        Commands::Whoami => commands::session::whoami(&desk, output)?,
        Commands::Register(args) => commands::session::register(&mut desk, args)?,

        Commands::Client { action } => commands::records::client(&mut desk, action, output)?,
        Commands::Appointment { action } => {
            commands::records::appointment(&mut desk, action, output)?
        }
        Commands::Sale { action } => commands::records::sale(&mut desk, action, output)?,
        Commands::Quote { action } => commands::records::quote(&mut desk, action, output)?,
        Commands::Link { action } => commands::records::link(&mut desk, action, output)?,

        Commands::Notify { action } => commands::notify::run(&mut desk, action, output)?,
        Commands::Broker { action } => commands::broker::run(&mut desk, action, output)?,
        Commands::Profile { action } => commands::broker::profile(&mut desk, action, output)?,

        Commands::Report { action } => commands::report::run(&desk, action, output)?,
        Commands::Stats => commands::report::stats(&desk, output)?,

        Commands::Version | Commands::HashPassword => {}
    }

    Ok(())
}
