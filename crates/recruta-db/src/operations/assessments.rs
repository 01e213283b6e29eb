//! Assessment log (pareceres).

use super::timestamp_from_sql;
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{
    Assessment, AssessmentId, CandidateId, HiringOutcome, JobId, PipelineStage, SourceFormat,
};
use rusqlite::params;

const ASSESSMENT_COLUMNS: &str = "id, job_id, candidate_id, created_at, client_name, job_title, \
     candidate_name, location, age, salary_expectation, linkedin_url, summary, analysis, \
     conclusion, source_format, source_path, stage, outcome, decline_reason";

/// Filter for listing assessments. Empty filter lists everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentFilter {
    pub candidate_id: Option<CandidateId>,
    pub job_id: Option<JobId>,
}

impl AssessmentFilter {
    pub fn for_candidate(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id: Some(candidate_id),
            job_id: None,
        }
    }

    pub fn for_job(job_id: JobId) -> Self {
        Self {
            candidate_id: None,
            job_id: Some(job_id),
        }
    }
}

impl Database {
    /// Append an assessment to the log, returning the assigned id.
    ///
    /// A second `pdf` record for the same source path violates the unique
    /// index; callers replacing an import delete the old row first.
    pub fn create_assessment(&self, assessment: &Assessment) -> DbResult<AssessmentId> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO assessments (job_id, candidate_id, created_at, client_name, job_title,
                                     candidate_name, location, age, salary_expectation,
                                     linkedin_url, summary, analysis, conclusion, source_format,
                                     source_path, stage, outcome, decline_reason)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                assessment.job_id,
                assessment.candidate_id,
                assessment.created_at.to_rfc3339(),
                assessment.client_name,
                assessment.job_title,
                assessment.candidate_name,
                assessment.location,
                assessment.age,
                assessment.salary_expectation,
                assessment.linkedin_url,
                assessment.summary,
                assessment.analysis,
                assessment.conclusion,
                assessment.source_format.as_str(),
                assessment.source_path,
                assessment.stage.as_str(),
                assessment.outcome.as_str(),
                assessment.decline_reason,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an assessment by ID.
    pub fn get_assessment(&self, id: AssessmentId) -> DbResult<Assessment> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM assessments WHERE id = ?1", ASSESSMENT_COLUMNS),
            params![id],
            row_to_assessment,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Assessment not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List assessments, newest first.
    pub fn list_assessments(&self, filter: &AssessmentFilter) -> DbResult<Vec<Assessment>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM assessments
             WHERE (?1 IS NULL OR candidate_id = ?1) AND (?2 IS NULL OR job_id = ?2)
             ORDER BY created_at DESC, id DESC",
            ASSESSMENT_COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![filter.candidate_id, filter.job_id],
            row_to_assessment,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Find the assessment imported from a given path, if any.
    pub fn find_assessment_by_source_path(&self, path: &str) -> DbResult<Option<Assessment>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM assessments WHERE source_path = ?1 ORDER BY id LIMIT 1",
                ASSESSMENT_COLUMNS
            ),
            params![path],
            row_to_assessment,
        );

        match result {
            Ok(assessment) => Ok(Some(assessment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// Delete an assessment by ID.
    pub fn delete_assessment(&self, id: AssessmentId) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM assessments WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Assessment not found: {}", id)));
        }

        Ok(())
    }

    /// Delete every assessment imported from `path`. Returns the number removed.
    pub fn delete_assessments_by_source_path(&self, path: &str) -> DbResult<usize> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM assessments WHERE source_path = ?1",
            params![path],
        )?;
        Ok(rows)
    }

    /// Overwrite the stage and outcome recorded on a log row.
    pub fn update_assessment_status(
        &self,
        id: AssessmentId,
        stage: PipelineStage,
        outcome: HiringOutcome,
        decline_reason: Option<&str>,
    ) -> DbResult<Assessment> {
        {
            let conn = self.conn()?;
            let rows = conn.execute(
                "UPDATE assessments SET stage = ?2, outcome = ?3, decline_reason = ?4 WHERE id = ?1",
                params![id, stage.as_str(), outcome.as_str(), decline_reason],
            )?;

            if rows == 0 {
                return Err(DbError::NotFound(format!("Assessment not found: {}", id)));
            }
        }

        self.get_assessment(id)
    }
}

fn row_to_assessment(row: &rusqlite::Row) -> rusqlite::Result<Assessment> {
    let created_str: String = row.get(3)?;
    let format_str: String = row.get(14)?;
    let stage_str: String = row.get(16)?;
    let outcome_str: String = row.get(17)?;

    Ok(Assessment {
        id: row.get(0)?,
        job_id: row.get(1)?,
        candidate_id: row.get(2)?,
        created_at: timestamp_from_sql(&created_str),
        client_name: row.get(4)?,
        job_title: row.get(5)?,
        candidate_name: row.get(6)?,
        location: row.get(7)?,
        age: row.get(8)?,
        salary_expectation: row.get(9)?,
        linkedin_url: row.get(10)?,
        summary: row.get(11)?,
        analysis: row.get(12)?,
        conclusion: row.get(13)?,
        source_format: SourceFormat::from_str(&format_str).unwrap_or_default(),
        source_path: row.get(15)?,
        stage: PipelineStage::from_str(&stage_str).unwrap_or_default(),
        outcome: HiringOutcome::from_str(&outcome_str).unwrap_or_default(),
        decline_reason: row.get(18)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruta_core::Candidate;

    #[test]
    fn test_assessment_crud() {
        let db = Database::open_in_memory().unwrap();
        let candidate = db.create_candidate(&Candidate::new("Maria Silva")).unwrap();

        let mut assessment = Assessment::new("Maria Silva", SourceFormat::Manual);
        assessment.candidate_id = Some(candidate);
        assessment.summary = "Dez anos em dados.".to_string();
        let id = db.create_assessment(&assessment).unwrap();

        let fetched = db.get_assessment(id).unwrap();
        assert_eq!(fetched.candidate_name, "Maria Silva");
        assert_eq!(fetched.summary, "Dez anos em dados.");
        assert_eq!(fetched.source_format, SourceFormat::Manual);
        assert_eq!(fetched.stage, PipelineStage::InReview);

        let updated = db
            .update_assessment_status(
                id,
                PipelineStage::Dropped,
                HiringOutcome::Rejected,
                Some("pretensão acima"),
            )
            .unwrap();
        assert_eq!(updated.outcome, HiringOutcome::Rejected);
        assert_eq!(updated.decline_reason.as_deref(), Some("pretensão acima"));

        db.delete_assessment(id).unwrap();
        assert!(db.get_assessment(id).unwrap_err().is_not_found());
        assert!(db.delete_assessment(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_pdf_source_path_is_unique() {
        let db = Database::open_in_memory().unwrap();
        let path = "/inbox/Parecer_Acme_Maria_20250101_0900.pdf";

        let first = Assessment::new("Maria", SourceFormat::Pdf).with_source_path(path);
        db.create_assessment(&first).unwrap();
        assert!(db.create_assessment(&first).is_err());

        // Non-pdf rows are not covered by the index
        let manual = Assessment::new("Maria", SourceFormat::Manual).with_source_path(path);
        db.create_assessment(&manual).unwrap();

        assert_eq!(db.delete_assessments_by_source_path(path).unwrap(), 2);
        db.create_assessment(&first).unwrap();
        assert!(db.find_assessment_by_source_path(path).unwrap().is_some());
        assert!(db.find_assessment_by_source_path("/other.pdf").unwrap().is_none());
    }

    #[test]
    fn test_list_assessments_filter() {
        let db = Database::open_in_memory().unwrap();
        let maria = db.create_candidate(&Candidate::new("Maria")).unwrap();
        let joao = db.create_candidate(&Candidate::new("João")).unwrap();

        for (name, id) in [("Maria", maria), ("Maria", maria), ("João", joao)] {
            let mut a = Assessment::new(name, SourceFormat::Manual);
            a.candidate_id = Some(id);
            db.create_assessment(&a).unwrap();
        }

        assert_eq!(db.list_assessments(&AssessmentFilter::default()).unwrap().len(), 3);
        assert_eq!(
            db.list_assessments(&AssessmentFilter::for_candidate(maria))
                .unwrap()
                .len(),
            2
        );
        assert!(db
            .list_assessments(&AssessmentFilter::for_job(99))
            .unwrap()
            .is_empty());
    }
}
