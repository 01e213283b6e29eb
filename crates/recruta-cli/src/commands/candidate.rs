//! Candidate commands.

use super::{format_timestamp, get_config, get_database, or_dash, resolve_candidate_ref};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use recruta_core::{Candidate, CandidateUpdate, HiringOutcome};
use recruta_db::AssessmentFilter;

/// Optional candidate fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct CandidateFields {
    /// Age in years
    #[arg(long)]
    pub age: Option<i64>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// LinkedIn profile URL
    #[arg(long)]
    pub linkedin: Option<String>,

    /// Role the candidate is looking for
    #[arg(long)]
    pub role: Option<String>,

    /// Salary expectation, as written
    #[arg(long)]
    pub salary: Option<String>,

    /// Path to the résumé file
    #[arg(long)]
    pub resume: Option<String>,
}

impl CandidateFields {
    fn into_update(self, name: Option<String>) -> CandidateUpdate {
        CandidateUpdate {
            name,
            age: self.age,
            city: self.city,
            phone: self.phone,
            email: self.email,
            linkedin_url: self.linkedin,
            desired_role: self.role,
            salary_expectation: self.salary,
            resume_path: self.resume,
        }
    }
}

pub fn add(name: &str, fields: CandidateFields) -> Result<()> {
    let db = get_database()?;

    let mut candidate = Candidate::new(name);
    fields.into_update(None).apply(&mut candidate);

    let id = db.create_candidate(&candidate)?;

    println!("{} Candidate registered: {}", "✓".green(), name.trim().white().bold());
    println!("  ID: {}", id.to_string().dimmed());

    Ok(())
}

pub fn list(search: Option<&str>, limit: i64) -> Result<()> {
    let db = get_database()?;

    let candidates = match search {
        Some(fragment) => db.search_candidates(fragment)?,
        None => db.list_candidates(Some(limit))?,
    };

    if candidates.is_empty() {
        println!(
            "{}",
            "No candidates found. Use 'recruta candidate add <name>' to register one.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Candidates".cyan().bold());
    println!("{}", "─".repeat(70));

    for candidate in candidates {
        let age = candidate
            .age
            .map(|a| format!(", {} anos", a))
            .unwrap_or_default();
        println!(
            "{} {}{} {}",
            format!("[{}]", candidate.id).dimmed(),
            candidate.name.white(),
            age,
            or_dash(&candidate.city).dimmed()
        );
        if let Some(ref role) = candidate.desired_role {
            println!("  {}", role.dimmed());
        }
    }

    Ok(())
}

pub fn show(reference: &str) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let id = resolve_candidate_ref(&db, reference)?;
    let candidate = db.get_candidate(id)?;

    println!("{}", candidate.name.cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  ID: {}", candidate.id);
    println!(
        "  Age: {}",
        candidate.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!("  City: {}", or_dash(&candidate.city));
    println!("  Phone: {}", or_dash(&candidate.phone));
    println!("  Email: {}", or_dash(&candidate.email));
    println!("  LinkedIn: {}", or_dash(&candidate.linkedin_url));
    println!("  Desired role: {}", or_dash(&candidate.desired_role));
    println!("  Salary expectation: {}", or_dash(&candidate.salary_expectation));
    println!("  Résumé: {}", or_dash(&candidate.resume_path));
    println!("  Registered: {}", candidate.registered_on);

    let links = db.list_links_for_candidate(id)?;
    if !links.is_empty() {
        println!();
        println!("{}", "Jobs".white().bold());
        for link in links {
            let job = db.get_job(link.job_id)?;
            let outcome = match link.outcome {
                HiringOutcome::Pending => String::new(),
                other => format!(" / {}", other.label()),
            };
            println!(
                "  {} {}: {}{}",
                format!("[{}]", job.id).dimmed(),
                job.title,
                link.stage.label().yellow(),
                outcome
            );
        }
    }

    let assessments = db.list_assessments(&AssessmentFilter::for_candidate(id))?;
    if !assessments.is_empty() {
        println!();
        println!("{}", "Pareceres".white().bold());
        for assessment in assessments {
            println!(
                "  {} {} {} ({})",
                format!("[{}]", assessment.id).dimmed(),
                format_timestamp(&assessment.created_at, &config.ui.date_format),
                assessment.job_title,
                assessment.source_format
            );
        }
    }

    Ok(())
}

pub fn edit(reference: &str, name: Option<String>, fields: CandidateFields) -> Result<()> {
    let db = get_database()?;

    let id = resolve_candidate_ref(&db, reference)?;
    let update = fields.into_update(name);

    if update.is_empty() {
        anyhow::bail!("Nothing to change. Pass at least one field, e.g. --city or --phone.");
    }

    let candidate = db.update_candidate(id, &update)?;
    println!("{} Candidate updated: {}", "✓".green(), candidate.name.white().bold());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_into_update() {
        let fields = CandidateFields {
            city: Some("Curitiba".to_string()),
            linkedin: Some("https://linkedin.com/in/maria".to_string()),
            ..Default::default()
        };
        let update = fields.into_update(Some("Maria Souza".to_string()));

        assert_eq!(update.name.as_deref(), Some("Maria Souza"));
        assert_eq!(update.city.as_deref(), Some("Curitiba"));
        assert!(update.linkedin_url.is_some());
        assert!(update.phone.is_none());
    }

    #[test]
    fn test_empty_fields_make_empty_update() {
        assert!(CandidateFields::default().into_update(None).is_empty());
    }
}
