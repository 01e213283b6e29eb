//! Job opening commands.

use super::{get_database, or_dash, parse_date_arg, resolve_client_ref};
use anyhow::{Context, Result};
use colored::Colorize;
use recruta_core::{Job, JobId, JobStatus, JobUpdate};
use recruta_db::Database;

const VALID_STATUSES: &str = "open, in_progress, closed, recovered";

fn parse_status(value: &str) -> Result<JobStatus> {
    JobStatus::from_str(value)
        .with_context(|| format!("Invalid status '{}'. Valid values: {}", value, VALID_STATUSES))
}

fn client_label(db: &Database, job: &Job) -> Result<String> {
    Ok(match job.client_id {
        Some(id) => db.get_client(id)?.name,
        None => "-".to_string(),
    })
}

pub fn add(
    title: &str,
    client: Option<&str>,
    modality: Option<String>,
    description: Option<String>,
    opened: Option<&str>,
) -> Result<()> {
    let db = get_database()?;

    let client_id = client.map(|c| resolve_client_ref(&db, c)).transpose()?;

    let mut job = Job::new(title).with_client(client_id);
    job.modality = modality;
    job.description = description;
    if let Some(date) = parse_date_arg(opened)? {
        job.opened_on = Some(date);
    }

    let id = db.create_job(&job)?;

    println!("{} Job opened: {}", "✓".green(), title.trim().white().bold());
    println!("  ID: {}", id.to_string().dimmed());

    Ok(())
}

pub fn list(status: Option<&str>, client: Option<&str>) -> Result<()> {
    let db = get_database()?;

    let status = status.map(parse_status).transpose()?;
    let client_id = client.map(|c| resolve_client_ref(&db, c)).transpose()?;

    let jobs = db.list_jobs(status, client_id)?;

    if jobs.is_empty() {
        println!(
            "{}",
            "No jobs found. Use 'recruta job add <title>' to open one.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Jobs".cyan().bold());
    println!("{}", "─".repeat(70));

    for job in jobs {
        let status_icon = match job.status {
            JobStatus::Open => "○".green(),
            JobStatus::InProgress => "◐".blue(),
            JobStatus::Closed => "●".dimmed(),
            JobStatus::Recovered => "↺".yellow(),
        };

        let title = if job.status == JobStatus::Closed {
            job.title.dimmed().to_string()
        } else {
            job.title.white().to_string()
        };

        println!(
            "{} {} {} {}",
            status_icon,
            title,
            format!("[{}]", job.id).dimmed(),
            client_label(&db, &job)?.dimmed()
        );
    }

    Ok(())
}

pub fn show(id: JobId) -> Result<()> {
    let db = get_database()?;
    let job = db.get_job(id)?;

    println!("{}", job.title.cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  ID: {}", job.id);
    println!("  Client: {}", client_label(&db, &job)?);
    println!("  Status: {}", job.status);
    println!("  Modality: {}", or_dash(&job.modality));
    println!(
        "  Opened: {}",
        job.opened_on.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    );
    if let Some(closed) = job.closed_on {
        println!("  Closed: {}", closed);
    }
    if let Some(ref description) = job.description {
        println!();
        println!("{}", description);
    }

    let links = db.list_links_for_job(id)?;
    if !links.is_empty() {
        println!();
        println!("{}", "Candidates".white().bold());
        for link in links {
            let candidate = db.get_candidate(link.candidate_id)?;
            println!(
                "  {} {}: {} / {}",
                format!("[{}]", candidate.id).dimmed(),
                candidate.name,
                link.stage.label().yellow(),
                link.outcome.label()
            );
        }
    }

    Ok(())
}

pub fn edit(
    id: JobId,
    title: Option<String>,
    client: Option<&str>,
    modality: Option<String>,
    description: Option<String>,
    opened: Option<&str>,
    closed: Option<&str>,
) -> Result<()> {
    let db = get_database()?;

    let update = JobUpdate {
        client_id: client.map(|c| resolve_client_ref(&db, c)).transpose()?,
        title,
        modality,
        description,
        opened_on: parse_date_arg(opened)?,
        closed_on: parse_date_arg(closed)?,
    };

    let job = db.update_job(id, &update)?;
    println!("{} Job updated: {}", "✓".green(), job.title.white().bold());

    Ok(())
}

pub fn set_status(id: JobId, status: &str) -> Result<()> {
    let db = get_database()?;

    let job = db.set_job_status(id, parse_status(status)?)?;
    println!(
        "{} {} is now {}",
        "✓".green(),
        job.title.white().bold(),
        job.status.to_string().cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("in_progress").unwrap(), JobStatus::InProgress);
        let err = parse_status("paused").unwrap_err().to_string();
        assert!(err.contains(VALID_STATUSES));
    }

    #[test]
    fn test_client_label() {
        let db = Database::open_in_memory().unwrap();
        let acme = db.create_client(&recruta_core::Client::new("Acme")).unwrap();

        let owned = Job::new("Analista").with_client(Some(acme));
        assert_eq!(client_label(&db, &owned).unwrap(), "Acme");
        assert_eq!(client_label(&db, &Job::new("Analista")).unwrap(), "-");
    }
}
