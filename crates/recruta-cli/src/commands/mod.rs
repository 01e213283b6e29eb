//! CLI command implementations.

pub mod access;
pub mod assessment;
pub mod candidate;
pub mod client;
pub mod config;
pub mod finance;
pub mod import;
pub mod init;
pub mod job;
pub mod pipeline;
pub mod stats;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use recruta_config::{AppPaths, Config};
use recruta_core::{parse_date, CandidateId, ClientId, HiringOutcome, PipelineStage};
use recruta_db::Database;

/// Get the application paths, honouring `general.data_dir`.
pub fn get_paths() -> Result<AppPaths> {
    let paths = AppPaths::new().context("Failed to determine application directories")?;

    let config = Config::load().unwrap_or_default();
    match config.general.data_dir {
        Some(dir) if !dir.trim().is_empty() => {
            let expanded = shellexpand::tilde(dir.trim()).to_string();
            Ok(paths.with_data_dir(expanded))
        }
        _ => Ok(paths),
    }
}

/// Load the configuration, falling back to defaults when there is no file.
pub fn get_config() -> Result<Config> {
    let paths = get_paths()?;
    Config::load_from(&paths.config_file).context("Failed to load config")
}

/// Get a database connection, ensuring recruta is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Recruta is not initialized. Run 'recruta init' first.");
    }

    Database::open(&paths.database_file).context("Failed to open database")
}

/// Accept a client by numeric id or exact name.
pub fn resolve_client_ref(db: &Database, reference: &str) -> Result<ClientId> {
    if let Ok(id) = reference.trim().parse::<ClientId>() {
        return Ok(db.get_client(id)?.id);
    }
    db.find_client_by_name(reference.trim())?
        .map(|c| c.id)
        .with_context(|| format!("Client not found: {}", reference))
}

/// Accept a candidate by numeric id or exact name.
pub fn resolve_candidate_ref(db: &Database, reference: &str) -> Result<CandidateId> {
    if let Ok(id) = reference.trim().parse::<CandidateId>() {
        return Ok(db.get_candidate(id)?.id);
    }
    db.find_candidate_by_name(reference.trim())?
        .map(|c| c.id)
        .with_context(|| format!("Candidate not found: {}", reference))
}

/// Parse an optional `YYYY-MM-DD` argument.
pub fn parse_date_arg(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
    }
}

/// Parse a pipeline stage key, listing the valid ones on failure.
pub fn parse_stage(value: &str) -> Result<PipelineStage> {
    PipelineStage::from_str(value).with_context(|| {
        let valid: Vec<&str> = PipelineStage::ALL.iter().map(|s| s.as_str()).collect();
        format!("Invalid stage '{}'. Valid values: {}", value, valid.join(", "))
    })
}

/// Parse a hiring outcome key, listing the valid ones on failure.
pub fn parse_outcome(value: &str) -> Result<HiringOutcome> {
    HiringOutcome::from_str(value).with_context(|| {
        let valid: Vec<&str> = HiringOutcome::ALL.iter().map(|o| o.as_str()).collect();
        format!("Invalid outcome '{}'. Valid values: {}", value, valid.join(", "))
    })
}

/// Render a stored timestamp in local time.
pub fn format_timestamp(ts: &DateTime<Utc>, date_format: &str) -> String {
    ts.with_timezone(&Local).format(date_format).to_string()
}

/// Print "-" for absent values.
pub fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or("-")
}

/// Format a file size in human-readable form.
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
