//! Financial record commands.

use super::{get_database, parse_date_arg, resolve_client_ref};
use anyhow::{Context, Result};
use colored::Colorize;
use recruta_core::{FinanceKind, FinanceStatus, FinancialRecord, FinancialRecordId};

fn parse_kind(value: &str) -> Result<FinanceKind> {
    FinanceKind::from_str(value).with_context(|| {
        format!(
            "Invalid kind '{}'. Valid values: service_order (os), quote, invoice",
            value
        )
    })
}

fn parse_status(value: &str) -> Result<FinanceStatus> {
    FinanceStatus::from_str(value).with_context(|| {
        format!(
            "Invalid status '{}'. Valid values: open, approved, paid, cancelled",
            value
        )
    })
}

pub fn add(
    kind: &str,
    client: &str,
    amount: &str,
    description: Option<String>,
    issued: Option<&str>,
    due: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let db = get_database()?;

    let kind = parse_kind(kind)?;
    let client = db.get_client(resolve_client_ref(&db, client)?)?;

    let mut record = FinancialRecord::new(kind, client.name.clone(), amount);
    record.client_id = Some(client.id);
    record.description = description.unwrap_or_default();
    record.notes = notes;
    if let Some(date) = parse_date_arg(issued)? {
        record.issued_on = Some(date);
    }
    record.due_on = parse_date_arg(due)?;

    let id = db.create_financial_record(&record)?;

    println!(
        "{} {} recorded for {}: {}",
        "✓".green(),
        kind,
        client.name.white().bold(),
        amount.trim()
    );
    println!("  ID: {}", id.to_string().dimmed());

    Ok(())
}

pub fn list(kind: Option<&str>, client: Option<&str>) -> Result<()> {
    let db = get_database()?;

    let kind = kind.map(parse_kind).transpose()?;
    let client_id = client.map(|c| resolve_client_ref(&db, c)).transpose()?;
    let records = db.list_financial_records(kind, client_id)?;

    if records.is_empty() {
        println!("{}", "No financial records found.".dimmed());
        return Ok(());
    }

    println!("{}", "Financial Records".cyan().bold());
    println!("{}", "─".repeat(70));

    for record in records {
        let status = match record.status {
            FinanceStatus::Open => record.status.as_str().yellow(),
            FinanceStatus::Approved => record.status.as_str().blue(),
            FinanceStatus::Paid => record.status.as_str().green(),
            FinanceStatus::Cancelled => record.status.as_str().dimmed(),
        };

        let due = record
            .due_on
            .map(|d| format!("due {}", d))
            .unwrap_or_default();

        println!(
            "{} {} {} {} {} {}",
            format!("[{}]", record.id).dimmed(),
            record.kind,
            record.client_name.white(),
            record.amount.bold(),
            status,
            due.dimmed()
        );
        if !record.description.is_empty() {
            println!("  {}", record.description.dimmed());
        }
        if let Some(ref notes) = record.notes {
            println!("  {}", notes.dimmed());
        }
    }

    Ok(())
}

pub fn set_status(id: FinancialRecordId, status: &str) -> Result<()> {
    let db = get_database()?;

    let record = db.set_finance_status(id, parse_status(status)?)?;
    println!(
        "{} {} {} is now {}",
        "✓".green(),
        record.kind,
        record.id,
        record.status.to_string().cyan()
    );

    Ok(())
}
