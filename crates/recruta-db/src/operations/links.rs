//! Pipeline record store: the job x candidate link table.
//!
//! Stages and outcomes are closed sets but there is no transition graph;
//! any value may follow any other.

use super::{non_blank, timestamp_from_sql};
use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::Utc;
use recruta_core::{
    CandidateId, HiringOutcome, JobCandidate, JobId, PipelineEntry, PipelineStage,
};
use rusqlite::params;
use std::collections::HashMap;

const LINK_COLUMNS: &str =
    "job_id, candidate_id, linked_at, note, stage, outcome, decline_reason, updated_at";

impl Database {
    /// Link a candidate to a job.
    ///
    /// Idempotent: an existing pair keeps its row, stage and outcome. The note
    /// is overwritten only when one is given.
    pub fn link(
        &self,
        job_id: JobId,
        candidate_id: CandidateId,
        note: Option<&str>,
    ) -> DbResult<JobCandidate> {
        let now = Utc::now().to_rfc3339();
        let note = non_blank(&note.map(str::to_string));

        {
            let conn = self.conn()?;
            conn.execute(
                r#"
                INSERT INTO job_candidates (job_id, candidate_id, linked_at, note, stage, outcome, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?3)
                ON CONFLICT(job_id, candidate_id) DO UPDATE SET
                    note = COALESCE(excluded.note, job_candidates.note),
                    updated_at = excluded.updated_at
                "#,
                params![
                    job_id,
                    candidate_id,
                    now,
                    note,
                    PipelineStage::default().as_str(),
                    HiringOutcome::default().as_str(),
                ],
            )?;
        }

        self.get_link(job_id, candidate_id)
    }

    /// Remove a link. Returns whether a row existed.
    pub fn unlink(&self, job_id: JobId, candidate_id: CandidateId) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM job_candidates WHERE job_id = ?1 AND candidate_id = ?2",
            params![job_id, candidate_id],
        )?;
        Ok(rows > 0)
    }

    /// Get the link for a job x candidate pair.
    pub fn get_link(&self, job_id: JobId, candidate_id: CandidateId) -> DbResult<JobCandidate> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM job_candidates WHERE job_id = ?1 AND candidate_id = ?2",
                LINK_COLUMNS
            ),
            params![job_id, candidate_id],
            row_to_link,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!(
                "Candidate {} is not linked to job {}",
                candidate_id, job_id
            )),
            _ => DbError::from(e),
        })
    }

    /// Move a linked candidate to a pipeline stage.
    pub fn set_stage(
        &self,
        job_id: JobId,
        candidate_id: CandidateId,
        stage: PipelineStage,
    ) -> DbResult<JobCandidate> {
        {
            let conn = self.conn()?;
            let rows = conn.execute(
                "UPDATE job_candidates SET stage = ?3, updated_at = ?4
                 WHERE job_id = ?1 AND candidate_id = ?2",
                params![job_id, candidate_id, stage.as_str(), Utc::now().to_rfc3339()],
            )?;
            if rows == 0 {
                return Err(not_linked(job_id, candidate_id));
            }
        }

        self.get_link(job_id, candidate_id)
    }

    /// Record the hiring outcome for a linked candidate.
    ///
    /// The decline reason is replaced by `reason` (cleared when `None`).
    pub fn set_outcome(
        &self,
        job_id: JobId,
        candidate_id: CandidateId,
        outcome: HiringOutcome,
        reason: Option<&str>,
    ) -> DbResult<JobCandidate> {
        let reason = non_blank(&reason.map(str::to_string));
        {
            let conn = self.conn()?;
            let rows = conn.execute(
                "UPDATE job_candidates SET outcome = ?3, decline_reason = ?4, updated_at = ?5
                 WHERE job_id = ?1 AND candidate_id = ?2",
                params![
                    job_id,
                    candidate_id,
                    outcome.as_str(),
                    reason,
                    Utc::now().to_rfc3339()
                ],
            )?;
            if rows == 0 {
                return Err(not_linked(job_id, candidate_id));
            }
        }

        self.get_link(job_id, candidate_id)
    }

    /// All links for a job, oldest first.
    pub fn list_links_for_job(&self, job_id: JobId) -> DbResult<Vec<JobCandidate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job_candidates WHERE job_id = ?1 ORDER BY linked_at, candidate_id",
            LINK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![job_id], row_to_link)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// All links for a candidate, oldest first.
    pub fn list_links_for_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> DbResult<Vec<JobCandidate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job_candidates WHERE candidate_id = ?1 ORDER BY linked_at, job_id",
            LINK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![candidate_id], row_to_link)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Joined pipeline view, optionally restricted to one job.
    pub fn pipeline_report(&self, job_id: Option<JobId>) -> DbResult<Vec<PipelineEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT j.id, j.title, cl.name, c.id, c.name, l.stage, l.outcome, l.decline_reason, l.updated_at
            FROM job_candidates l
            INNER JOIN jobs j ON j.id = l.job_id
            INNER JOIN candidates c ON c.id = l.candidate_id
            LEFT JOIN clients cl ON cl.id = j.client_id
            WHERE ?1 IS NULL OR l.job_id = ?1
            ORDER BY j.id, l.updated_at DESC, c.name
            "#,
        )?;

        let rows = stmt.query_map(params![job_id], |row| {
            let stage_str: String = row.get(5)?;
            let outcome_str: String = row.get(6)?;
            let updated_str: String = row.get(8)?;

            Ok(PipelineEntry {
                job_id: row.get(0)?,
                job_title: row.get(1)?,
                client_name: row.get(2)?,
                candidate_id: row.get(3)?,
                candidate_name: row.get(4)?,
                stage: PipelineStage::from_str(&stage_str).unwrap_or_default(),
                outcome: HiringOutcome::from_str(&outcome_str).unwrap_or_default(),
                decline_reason: row.get(7)?,
                updated_at: timestamp_from_sql(&updated_str),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Number of links per stage, optionally restricted to one job.
    pub fn stage_counts(&self, job_id: Option<JobId>) -> DbResult<HashMap<PipelineStage, i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT stage, COUNT(*) FROM job_candidates
             WHERE ?1 IS NULL OR job_id = ?1 GROUP BY stage",
        )?;
        let rows = stmt.query_map(params![job_id], |row| {
            let stage: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((stage, count))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (stage, count) = row?;
            let stage = PipelineStage::from_str(&stage).unwrap_or_default();
            *counts.entry(stage).or_insert(0) += count;
        }
        Ok(counts)
    }
}

fn not_linked(job_id: JobId, candidate_id: CandidateId) -> DbError {
    DbError::NotFound(format!(
        "Candidate {} is not linked to job {}",
        candidate_id, job_id
    ))
}

fn row_to_link(row: &rusqlite::Row) -> rusqlite::Result<JobCandidate> {
    let linked_str: String = row.get(2)?;
    let stage_str: String = row.get(4)?;
    let outcome_str: String = row.get(5)?;
    let updated_str: String = row.get(7)?;

    Ok(JobCandidate {
        job_id: row.get(0)?,
        candidate_id: row.get(1)?,
        linked_at: timestamp_from_sql(&linked_str),
        note: row.get(3)?,
        stage: PipelineStage::from_str(&stage_str).unwrap_or_default(),
        outcome: HiringOutcome::from_str(&outcome_str).unwrap_or_default(),
        decline_reason: row.get(6)?,
        updated_at: timestamp_from_sql(&updated_str),
    })
}
