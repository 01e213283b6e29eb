//! Pipeline commands: linking candidates to jobs and moving them along.

use super::{
    format_timestamp, get_config, get_database, parse_outcome, parse_stage, resolve_candidate_ref,
};
use anyhow::Result;
use colored::Colorize;
use recruta_core::{HiringOutcome, JobId, PipelineEntry, PipelineStage};

pub fn link(job_id: JobId, candidate: &str, note: Option<&str>) -> Result<()> {
    let db = get_database()?;

    let job = db.get_job(job_id)?;
    let candidate_id = resolve_candidate_ref(&db, candidate)?;
    let link = db.link(job.id, candidate_id, note)?;

    println!(
        "{} Linked {} to {} ({})",
        "✓".green(),
        db.get_candidate(candidate_id)?.name.white().bold(),
        job.title.white().bold(),
        link.stage.label()
    );

    Ok(())
}

pub fn unlink(job_id: JobId, candidate: &str) -> Result<()> {
    let db = get_database()?;

    let candidate_id = resolve_candidate_ref(&db, candidate)?;
    if db.unlink(job_id, candidate_id)? {
        println!("{} Link removed.", "✓".green());
    } else {
        println!("{} Candidate was not linked to job {}.", "Note:".yellow(), job_id);
    }

    Ok(())
}

pub fn stage(job_id: JobId, candidate: &str, stage: &str) -> Result<()> {
    let db = get_database()?;

    let stage = parse_stage(stage)?;
    let candidate_id = resolve_candidate_ref(&db, candidate)?;
    let link = db.set_stage(job_id, candidate_id, stage)?;

    println!("{} Stage set to {}", "✓".green(), link.stage.label().cyan());

    Ok(())
}

pub fn outcome(job_id: JobId, candidate: &str, outcome: &str, reason: Option<&str>) -> Result<()> {
    let db = get_database()?;

    let outcome = parse_outcome(outcome)?;
    let candidate_id = resolve_candidate_ref(&db, candidate)?;
    let link = db.set_outcome(job_id, candidate_id, outcome, reason)?;

    println!("{} Outcome set to {}", "✓".green(), link.outcome.label().cyan());
    if let Some(ref reason) = link.decline_reason {
        println!("  Reason: {}", reason);
    }

    Ok(())
}

pub fn report(job_id: Option<JobId>) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let entries = db.pipeline_report(job_id)?;

    if entries.is_empty() {
        println!(
            "{}",
            "Pipeline is empty. Use 'recruta link <job> <candidate>' to add candidates.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Pipeline".cyan().bold());
    println!("{}", "─".repeat(70));

    let mut current_job = None;
    for entry in &entries {
        if current_job != Some(entry.job_id) {
            current_job = Some(entry.job_id);
            println!();
            println!("{}", job_heading(entry).white().bold());
        }

        let stage = match entry.stage {
            PipelineStage::Dropped => entry.stage.label().dimmed(),
            PipelineStage::Finalist => entry.stage.label().green(),
            _ => entry.stage.label().yellow(),
        };
        let outcome = match entry.outcome {
            HiringOutcome::Pending => String::new(),
            HiringOutcome::Hired => format!(" {}", entry.outcome.label().green().bold()),
            _ => format!(" {}", entry.outcome.label().red()),
        };

        println!(
            "  {} {} {}{} {}",
            format!("[{}]", entry.candidate_id).dimmed(),
            entry.candidate_name,
            stage,
            outcome,
            format_timestamp(&entry.updated_at, &config.ui.date_format).dimmed()
        );
        if let Some(ref reason) = entry.decline_reason {
            println!("      {}", reason.dimmed());
        }
    }

    let counts = db.stage_counts(job_id)?;
    println!();
    println!("{}", "By stage".white().bold());
    for stage in PipelineStage::ALL {
        println!("  {}: {}", stage.label(), counts.get(&stage).copied().unwrap_or(0));
    }

    Ok(())
}

fn job_heading(entry: &PipelineEntry) -> String {
    match entry.client_name {
        Some(ref client) => format!("{} - {} [{}]", client, entry.job_title, entry.job_id),
        None => format!("{} [{}]", entry.job_title, entry.job_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(client_name: Option<&str>) -> PipelineEntry {
        PipelineEntry {
            job_id: 3,
            job_title: "Analista de Dados".to_string(),
            client_name: client_name.map(str::to_string),
            candidate_id: 1,
            candidate_name: "Maria Silva".to_string(),
            stage: PipelineStage::Interview,
            outcome: HiringOutcome::Pending,
            decline_reason: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_job_heading() {
        assert_eq!(job_heading(&entry(Some("Acme"))), "Acme - Analista de Dados [3]");
        assert_eq!(job_heading(&entry(None)), "Analista de Dados [3]");
    }
}
