//! Assessment (parecer) commands.

use super::{
    format_timestamp, get_config, get_database, parse_outcome, parse_stage, resolve_candidate_ref,
};
use anyhow::{Context, Result};
use colored::Colorize;
use recruta_core::{Assessment, AssessmentId, Candidate, Job, JobId, SourceFormat};
use recruta_db::AssessmentFilter;
use recruta_draft::{DraftInput, Drafter, Narratives};
use tracing::warn;

/// Narrative text typed on the command line. Empty sections may be drafted.
#[derive(Debug, Default)]
pub struct NarrativeArgs {
    pub summary: Option<String>,
    pub analysis: Option<String>,
    pub conclusion: Option<String>,
    pub notes: Option<String>,
    pub notes_file: Option<String>,
}

impl NarrativeArgs {
    fn notes(&self) -> Result<String> {
        match (&self.notes, &self.notes_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => {
                let path = shellexpand::tilde(path).to_string();
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read notes file: {}", path))
            }
            (None, None) => Ok(String::new()),
        }
    }
}

pub fn new(
    candidate: &str,
    job_id: Option<JobId>,
    narrative: NarrativeArgs,
    draft: bool,
) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let candidate_id = resolve_candidate_ref(&db, candidate)?;
    let candidate = db.get_candidate(candidate_id)?;
    let job = job_id.map(|id| db.get_job(id)).transpose()?;
    let client_name = match job.as_ref().and_then(|j| j.client_id) {
        Some(id) => db.get_client(id)?.name,
        None => String::new(),
    };

    let mut assessment = snapshot(&candidate, job.as_ref(), &client_name);
    let notes = narrative.notes()?;

    let drafted = if draft {
        match Drafter::from_config(&config.generator) {
            Ok(drafter) => {
                println!("{}", "Drafting narratives...".cyan());
                drafter.draft(&draft_input(&assessment, notes))
            }
            Err(e) => {
                warn!("Narrative drafting unavailable: {}", e);
                println!("{} Drafting skipped: {}", "Note:".yellow(), e);
                Narratives::default()
            }
        }
    } else {
        Narratives::default()
    };

    apply_narratives(&mut assessment, narrative, drafted);

    if let Some(ref job) = job {
        db.link(job.id, candidate_id, None)?;
    }
    let id = db.create_assessment(&assessment)?;

    println!(
        "{} Parecer recorded for {}",
        "✓".green(),
        assessment.candidate_name.white().bold()
    );
    println!("  ID: {}", id.to_string().dimmed());
    if assessment.summary.is_empty()
        && assessment.analysis.is_empty()
        && assessment.conclusion.is_empty()
    {
        println!("  {}", "No narrative sections yet.".dimmed());
    }

    Ok(())
}

/// A manual log row seeded from the current candidate and job records.
fn snapshot(candidate: &Candidate, job: Option<&Job>, client_name: &str) -> Assessment {
    let mut assessment = Assessment::new(candidate.name.clone(), SourceFormat::Manual);
    assessment.candidate_id = Some(candidate.id);
    assessment.job_id = job.map(|j| j.id);
    assessment.job_title = job.map(|j| j.title.clone()).unwrap_or_default();
    assessment.client_name = client_name.to_string();
    assessment.location = candidate.city.clone().unwrap_or_default();
    assessment.age = candidate.age.map(|a| a.to_string()).unwrap_or_default();
    assessment.salary_expectation = candidate.salary_expectation.clone().unwrap_or_default();
    assessment.linkedin_url = candidate.linkedin_url.clone().unwrap_or_default();
    assessment
}

fn draft_input(assessment: &Assessment, notes: String) -> DraftInput {
    DraftInput {
        candidate_name: assessment.candidate_name.clone(),
        job_title: assessment.job_title.clone(),
        client_name: assessment.client_name.clone(),
        location: assessment.location.clone(),
        age: assessment.age.clone(),
        salary_expectation: assessment.salary_expectation.clone(),
        notes,
    }
}

/// Typed sections win over drafted ones.
fn apply_narratives(assessment: &mut Assessment, typed: NarrativeArgs, drafted: Narratives) {
    assessment.summary = typed.summary.unwrap_or(drafted.summary);
    assessment.analysis = typed.analysis.unwrap_or(drafted.analysis);
    assessment.conclusion = typed.conclusion.unwrap_or(drafted.conclusion);
}

pub fn list(candidate: Option<&str>, job_id: Option<JobId>) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;

    let filter = AssessmentFilter {
        candidate_id: candidate.map(|c| resolve_candidate_ref(&db, c)).transpose()?,
        job_id,
    };
    let assessments = db.list_assessments(&filter)?;

    if assessments.is_empty() {
        println!(
            "{}",
            "No pareceres found. Use 'recruta import' or 'recruta assessment new'.".dimmed()
        );
        return Ok(());
    }

    println!("{}", "Pareceres".cyan().bold());
    println!("{}", "─".repeat(70));

    for assessment in assessments {
        let context = [assessment.client_name.as_str(), assessment.job_title.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ");

        println!(
            "{} {} {} {}",
            format!("[{}]", assessment.id).dimmed(),
            format_timestamp(&assessment.created_at, &config.ui.date_format),
            assessment.candidate_name.white(),
            context.dimmed()
        );
    }

    Ok(())
}

pub fn show(id: AssessmentId) -> Result<()> {
    let config = get_config()?;
    let db = get_database()?;
    print_assessment(&db.get_assessment(id)?, &config.ui.date_format);
    Ok(())
}

fn print_assessment(a: &Assessment, date_format: &str) {
    println!("{}", a.candidate_name.cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  ID: {}", a.id);
    println!("  Date: {}", format_timestamp(&a.created_at, date_format));
    println!("  Client: {}", dash(&a.client_name));
    println!("  Job: {}", dash(&a.job_title));
    println!("  Location: {}", dash(&a.location));
    println!("  Age: {}", dash(&a.age));
    println!("  Salary expectation: {}", dash(&a.salary_expectation));
    println!("  LinkedIn: {}", dash(&a.linkedin_url));
    println!("  Stage: {} / {}", a.stage.label(), a.outcome.label());
    if let Some(ref reason) = a.decline_reason {
        println!("  Reason: {}", reason);
    }
    println!(
        "  Source: {}{}",
        a.source_format,
        a.source_path
            .as_ref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default()
    );

    for (heading, text) in [
        ("Resumo Profissional", &a.summary),
        ("Análise de Perfil", &a.analysis),
        ("Conclusão", &a.conclusion),
    ] {
        if !text.is_empty() {
            println!();
            println!("{}", heading.white().bold());
            println!("{}", text);
        }
    }
}

pub fn set_status(
    id: AssessmentId,
    stage: Option<&str>,
    outcome: Option<&str>,
    reason: Option<&str>,
) -> Result<()> {
    let db = get_database()?;

    let current = db.get_assessment(id)?;
    let stage = stage.map(parse_stage).transpose()?.unwrap_or(current.stage);
    let outcome = outcome.map(parse_outcome).transpose()?.unwrap_or(current.outcome);

    let updated = db.update_assessment_status(id, stage, outcome, reason)?;
    println!(
        "{} Parecer {} is now {} / {}",
        "✓".green(),
        updated.id,
        updated.stage.label().cyan(),
        updated.outcome.label().cyan()
    );

    Ok(())
}

pub fn delete(id: AssessmentId) -> Result<()> {
    let db = get_database()?;

    db.delete_assessment(id)?;
    println!("{} Parecer {} deleted.", "✓".green(), id);

    Ok(())
}

fn dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruta_draft::{DraftResult, TextGenerator};

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        fn generate(&self, prompt: &str) -> DraftResult<String> {
            let section = prompt
                .lines()
                .find_map(|l| l.strip_prefix("Seção: "))
                .unwrap_or("?");
            Ok(format!("Rascunho: {}", section))
        }
    }

    fn candidate() -> Candidate {
        let mut candidate = Candidate::new("Maria Silva").with_city("Curitiba").with_age(31);
        candidate.id = 7;
        candidate
    }

    #[test]
    fn test_snapshot_copies_candidate_and_job() {
        let mut job = Job::new("Analista de Dados");
        job.id = 3;

        let assessment = snapshot(&candidate(), Some(&job), "Acme");
        assert_eq!(assessment.candidate_id, Some(7));
        assert_eq!(assessment.job_id, Some(3));
        assert_eq!(assessment.job_title, "Analista de Dados");
        assert_eq!(assessment.client_name, "Acme");
        assert_eq!(assessment.location, "Curitiba");
        assert_eq!(assessment.age, "31");
        assert_eq!(assessment.source_format, SourceFormat::Manual);
        assert!(assessment.source_path.is_none());
    }

    #[test]
    fn test_typed_sections_win_over_drafted() {
        let mut assessment = snapshot(&candidate(), None, "");
        let drafter = Drafter::new(Box::new(EchoGenerator));
        let drafted = drafter.draft(&draft_input(&assessment, String::new()));

        let typed = NarrativeArgs {
            conclusion: Some("Recomendo seguir.".to_string()),
            ..Default::default()
        };
        apply_narratives(&mut assessment, typed, drafted);

        assert_eq!(assessment.summary, "Rascunho: Resumo Profissional");
        assert_eq!(assessment.analysis, "Rascunho: Análise de Perfil");
        assert_eq!(assessment.conclusion, "Recomendo seguir.");
    }

    #[test]
    fn test_notes_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("entrevista.txt");
        std::fs::write(&file, "Boa comunicação.").unwrap();

        let args = NarrativeArgs {
            notes_file: Some(file.to_string_lossy().to_string()),
            ..Default::default()
        };
        assert_eq!(args.notes().unwrap(), "Boa comunicação.");

        let missing = NarrativeArgs {
            notes_file: Some("/nonexistent/notes.txt".to_string()),
            ..Default::default()
        };
        assert!(missing.notes().is_err());
    }
}
