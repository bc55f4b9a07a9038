use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tesoro_checks::{Check, CheckHistory, CheckLifecycle, CheckStatus, CheckStatusEvent};
use tesoro_ledger::{BalanceEngine, CreditExposure, Movement, MovementKind, Statement};
use tesoro_sdk::TesoroConfig;
use tesoro_types::ClientId;

use crate::cli::*;

pub fn run_command(cli: Cli, config: &TesoroConfig) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Statement(args) => cmd_statement(args, format),
        Command::Exposure(args) => cmd_exposure(args, config, format),
        Command::Lifecycle => cmd_lifecycle(format),
        Command::History(args) => cmd_history(args, format),
        Command::Expiring(args) => cmd_expiring(args, config, format),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_movements(path: &Path, client: Option<ClientId>) -> anyhow::Result<Vec<Movement>> {
    let mut movements: Vec<Movement> = read_json(path)?;
    if let Some(client) = client {
        movements.retain(|m| m.client_id == client);
    }
    tracing::debug!(count = movements.len(), path = %path.display(), "movements loaded");
    Ok(movements)
}

fn kind_label(kind: MovementKind) -> colored::ColoredString {
    match kind {
        MovementKind::Debe => "debe ".yellow(),
        MovementKind::Haber => "haber".green(),
    }
}

fn saldo_label(saldo: Decimal) -> colored::ColoredString {
    let text = saldo.to_string();
    if saldo > Decimal::ZERO {
        text.red().bold()
    } else {
        text.green().bold()
    }
}

fn cmd_statement(args: StatementArgs, format: OutputFormat) -> anyhow::Result<()> {
    let movements = load_movements(&args.movements, args.client)?;
    let statement = BalanceEngine::statement(&movements, args.from, args.to)?;

    match format {
        OutputFormat::Json => print_json(&statement),
        OutputFormat::Text => {
            let snapshot = BalanceEngine::compute_snapshot(&movements)?;
            print_statement(&statement);
            println!("  Fingerprint: {}", snapshot.short_fingerprint()?.dimmed());
            Ok(())
        }
    }
}

fn period_label(statement: &Statement) -> String {
    let bound =
        |d: Option<chrono::NaiveDate>| d.map_or_else(|| "..".to_string(), |d| d.to_string());
    format!("{} to {}", bound(statement.from), bound(statement.to))
}

fn print_statement(statement: &Statement) {
    println!("Statement {}", period_label(statement).bold());
    println!("  Opening balance: {}", statement.opening_balance);
    for entry in &statement.entries {
        let m = &entry.movement;
        println!(
            "  {}  {}  {:>14}  {:<16} saldo {}",
            m.date,
            kind_label(m.kind),
            m.amount,
            m.category.to_string().cyan(),
            entry.saldo_acumulado
        );
    }
    if statement.entries.is_empty() {
        println!("  {}", "No movements in period.".dimmed());
    }
    println!(
        "  Period: debe {} / haber {}",
        statement.period_debe, statement.period_haber
    );
    println!("  Closing balance: {}", saldo_label(statement.closing_balance));
}

fn cmd_exposure(
    args: ExposureArgs,
    config: &TesoroConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let movements = load_movements(&args.movements, args.client)?;
    let snapshot = BalanceEngine::compute_snapshot(&movements)?;
    let exposure = CreditExposure::evaluate(args.limit, &snapshot, config.credit_warning_ratio)?;

    match format {
        OutputFormat::Json => print_json(&exposure),
        OutputFormat::Text => {
            println!("Credit exposure");
            println!("  Limit:       {}", exposure.limit);
            println!("  Saldo:       {}", saldo_label(exposure.saldo_actual));
            println!("  Available:   {}", exposure.available.to_string().bold());
            if let Some(u) = exposure.utilization {
                match u.checked_mul(Decimal::ONE_HUNDRED) {
                    Some(pct) => println!("  Utilization: {}%", pct.round_dp(2)),
                    None => println!("  Utilization: {}x", u.round_dp(2)),
                }
            }
            if exposure.exceeded {
                println!("  {} limit exceeded", "✗".red().bold());
            } else if exposure.near_limit {
                println!("  {} near the limit", "!".yellow().bold());
            } else {
                println!("  {} within limit", "✓".green().bold());
            }
            Ok(())
        }
    }
}

fn transition_table() -> BTreeMap<CheckStatus, &'static [CheckStatus]> {
    CheckStatus::ALL
        .iter()
        .map(|s| (*s, s.allowed_targets()))
        .collect()
}

fn cmd_lifecycle(format: OutputFormat) -> anyhow::Result<()> {
    let table = transition_table();
    match format {
        OutputFormat::Json => print_json(&table),
        OutputFormat::Text => {
            for (from, targets) in &table {
                if targets.is_empty() {
                    println!("  {:<11} {}", from.as_str().bold(), "(terminal)".dimmed());
                } else {
                    let names: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();
                    println!("  {:<11} -> {}", from.as_str().bold(), names.join(", "));
                }
            }
            Ok(())
        }
    }
}

fn cmd_history(args: HistoryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let events: Vec<CheckStatusEvent> = read_json(&args.events)?;
    let history = CheckHistory::from_events(args.check, &events)?;
    if history.is_empty() {
        anyhow::bail!("no events for check {}", args.check);
    }

    match format {
        OutputFormat::Json => print_json(&history),
        OutputFormat::Text => {
            println!("Check {}", args.check.short_id().yellow().bold());
            for event in &history.events {
                match &event.reason {
                    Some(reason) => println!("  {}  {}  ({})", event.date, event.summary(), reason),
                    None => println!("  {}  {}", event.date, event.summary()),
                }
            }
            if let Some(status) = history.current_status() {
                println!("  Current: {}", status.as_str().cyan().bold());
            }
            Ok(())
        }
    }
}

fn cmd_expiring(
    args: ExpiringArgs,
    config: &TesoroConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let checks: Vec<Check> = read_json(&args.checks)?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let grace = args.grace.unwrap_or(config.expiry_grace_days);
    let candidates = CheckLifecycle::expiry_candidates(&checks, today, grace);

    match format {
        OutputFormat::Json => print_json(&candidates),
        OutputFormat::Text => {
            if candidates.is_empty() {
                println!("No checks past due as of {today}.");
                return Ok(());
            }
            println!(
                "{} check(s) past due as of {} (grace {} days):",
                candidates.len().to_string().bold(),
                today,
                grace
            );
            for check in candidates {
                println!(
                    "  #{:<8} due {}  {:>14}  {}",
                    check.number,
                    check.due_date.to_string().red(),
                    check.amount,
                    check.counterparty.name
                );
            }
            Ok(())
        }
    }
}
