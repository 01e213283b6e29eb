//! Stats command - show registry statistics.

use super::{format_size, get_database};
use anyhow::Result;
use colored::Colorize;
use recruta_core::{PipelineStage, SourceFormat};
use recruta_db::Database;

pub fn run() -> Result<()> {
    let db = get_database()?;
    run_with_db(&db)
}

/// Run stats with an existing database connection.
pub fn run_with_db(db: &Database) -> Result<()> {
    let stats = db.get_stats()?;

    println!("{}", "Recruta Statistics".cyan().bold());
    println!("{}", "─".repeat(50));

    println!();
    println!("{}", "Registry".white().bold());
    println!("  Candidates: {}", stats.candidates.to_string().green());
    println!("  Clients: {}", stats.clients);
    println!("  Jobs: {} ({} open)", stats.jobs, stats.open_jobs.to_string().yellow());

    println!();
    println!("{}", "Pipeline".white().bold());
    println!("  Links: {}", stats.links);
    for stage in PipelineStage::ALL {
        let count = stats.links_by_stage.get(stage.as_str()).copied().unwrap_or(0);
        if count > 0 {
            println!("    {}: {}", stage.label(), count);
        }
    }

    println!();
    println!("{}", "Pareceres".white().bold());
    println!("  Total: {}", stats.assessments);
    for format in [SourceFormat::Pdf, SourceFormat::Docx, SourceFormat::Manual] {
        let count = stats
            .assessments_by_format
            .get(format.as_str())
            .copied()
            .unwrap_or(0);
        if count > 0 {
            println!("    {}: {}", format, count);
        }
    }

    println!();
    println!("{}", "Back Office".white().bold());
    println!("  Active access grants: {}", stats.active_access_grants);
    println!("  Financial records: {}", stats.financial_records);

    println!();
    println!("{}", "Storage".white().bold());
    println!("  Database size: {}", format_size(stats.database_size_bytes));
    let integrity = if db.integrity_check()? {
        "ok".green()
    } else {
        "FAILED".red().bold()
    };
    println!("  Integrity: {}", integrity);

    Ok(())
}
