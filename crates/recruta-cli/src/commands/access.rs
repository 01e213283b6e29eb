//! Access grant commands.

use super::{get_database, parse_date_arg, resolve_candidate_ref, resolve_client_ref};
use anyhow::Result;
use colored::Colorize;
use recruta_core::{AccessGrant, AccessGrantId, AccessStatus, ACCESS_SYSTEMS};
use recruta_db::DbError;

pub fn grant(
    client: &str,
    candidate: &str,
    system: &str,
    access_type: Option<String>,
    starts: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let db = get_database()?;

    let client = db.get_client(resolve_client_ref(&db, client)?)?;
    let candidate = db.get_candidate(resolve_candidate_ref(&db, candidate)?)?;

    let mut grant = AccessGrant::new(client.name.clone(), candidate.name.clone(), system);
    grant.client_id = Some(client.id);
    grant.candidate_id = Some(candidate.id);
    grant.access_type = access_type;
    grant.notes = notes;
    if let Some(date) = parse_date_arg(starts)? {
        grant.starts_on = Some(date);
    }

    let id = match db.create_access_grant(&grant) {
        Ok(id) => id,
        Err(DbError::InvalidInput(message)) => {
            anyhow::bail!("{}. Known systems: {}", message, ACCESS_SYSTEMS.join(", "));
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} Access requested: {} on {} for {}",
        "✓".green(),
        candidate.name.white().bold(),
        db.get_access_grant(id)?.system.cyan(),
        client.name
    );
    println!("  ID: {}", id.to_string().dimmed());

    Ok(())
}

pub fn list(client: Option<&str>, candidate: Option<&str>) -> Result<()> {
    let db = get_database()?;

    let client_id = client.map(|c| resolve_client_ref(&db, c)).transpose()?;
    let candidate_id = candidate.map(|c| resolve_candidate_ref(&db, c)).transpose()?;
    let grants = db.list_access_grants(client_id, candidate_id)?;

    if grants.is_empty() {
        println!("{}", "No access grants found.".dimmed());
        return Ok(());
    }

    println!("{}", "Access Grants".cyan().bold());
    println!("{}", "─".repeat(70));

    for grant in grants {
        let status_icon = match grant.status {
            AccessStatus::Active => "●".green(),
            AccessStatus::Pending => "○".yellow(),
            AccessStatus::Revoked => "✗".dimmed(),
        };

        let period = match (grant.starts_on, grant.ends_on) {
            (Some(start), Some(end)) => format!("{} → {}", start, end),
            (Some(start), None) => format!("since {}", start),
            _ => String::new(),
        };

        println!(
            "{} {} {} @ {} {} {}",
            status_icon,
            grant.candidate_name.white(),
            grant.system.cyan(),
            grant.client_name,
            format!("[{}]", grant.id).dimmed(),
            period.dimmed()
        );
        if let Some(ref access_type) = grant.access_type {
            println!("  {}", access_type.dimmed());
        }
    }

    Ok(())
}

pub fn set_status(id: AccessGrantId, status: AccessStatus) -> Result<()> {
    let db = get_database()?;

    let grant = db.set_access_status(id, status)?;
    println!(
        "{} {} on {} is now {}",
        "✓".green(),
        grant.candidate_name.white().bold(),
        grant.system,
        grant.status.to_string().cyan()
    );

    Ok(())
}
