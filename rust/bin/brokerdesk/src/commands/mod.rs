//! Command implementations and the helpers they share.

pub mod broker;
pub mod notify;
pub mod records;
pub mod report;
pub mod session;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use brokerdesk_core::{DeskConfig, ServiceError};
use brokerdesk_kv::{KVStore, RedbStore};
use desk::session::AdminCredential;
use desk::Desk;
use serde_json::Value;
use tracing::debug;

use crate::Output;

/// Open the database named by `config` and restore any persisted session.
pub fn open_desk(config: &DeskConfig) -> Result<Desk> {
    let db_path = config.resolve_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!("opening {}", db_path.display());

    let kv: Arc<dyn KVStore> = Arc::new(
        RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", db_path.display(), e))?,
    );
    Ok(Desk::open(kv, AdminCredential::from_config(config))?)
}

/// Lift a desk error into `anyhow` through `ServiceError`, so `main` can pick
/// the exit code.
pub fn svc<E: Into<ServiceError>>(e: E) -> anyhow::Error {
    anyhow::Error::new(e.into())
}

/// Read one line from stdin after printing `label`.
pub fn prompt_line(label: &str) -> Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Use `given`, or prompt twice for a new password.
pub fn new_password(given: Option<String>) -> Result<String> {
    if let Some(p) = given {
        if p.is_empty() {
            anyhow::bail!("Password cannot be empty.");
        }
        return Ok(p);
    }
    let pw = rpassword::prompt_password("New password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if pw != confirm {
        anyhow::bail!("Passwords do not match.");
    }
    if pw.is_empty() {
        anyhow::bail!("Password cannot be empty.");
    }
    Ok(pw)
}

/// Ask for a y/N confirmation.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{} [y/N]: ", question))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

/// Render rows either as aligned columns or as a JSON array.
pub fn print_rows<T: serde::Serialize>(
    output: Output,
    header: &[&str],
    items: &[&T],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(items)?),
        Output::Table => {
            let rows: Vec<Vec<String>> = items.iter().map(|i| row(*i)).collect();
            print!("{}", render_table(header, &rows));
        }
    }
    Ok(())
}

/// Print a single value as pretty JSON.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a `--json` argument.
pub fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
}

fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(header.to_vec());
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        out.push_str("(none)\n");
    }
    out
}
