//! Job opening repository.

use super::{date_from_sql, date_to_sql, non_blank};
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{ClientId, Job, JobId, JobStatus, JobUpdate};
use rusqlite::params;

const JOB_COLUMNS: &str =
    "id, client_id, title, modality, opened_on, closed_on, status, description";

impl Database {
    /// Create a job opening, returning the assigned id.
    pub fn create_job(&self, job: &Job) -> DbResult<JobId> {
        let title = job.title.trim();
        if title.is_empty() {
            return Err(DbError::InvalidInput("job title is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO jobs (client_id, title, modality, opened_on, closed_on, status, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                job.client_id,
                title,
                non_blank(&job.modality),
                date_to_sql(job.opened_on),
                date_to_sql(job.closed_on),
                job.status.as_str(),
                non_blank(&job.description),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a job by ID.
    pub fn get_job(&self, id: JobId) -> DbResult<Job> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM jobs WHERE id = ?1", JOB_COLUMNS),
            params![id],
            row_to_job,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Job not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Find a job by exact title under the same client reference.
    ///
    /// `None` only matches jobs that have no client either.
    pub fn find_job(&self, client_id: Option<ClientId>, title: &str) -> DbResult<Option<Job>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM jobs WHERE client_id IS ?1 AND title = ?2 ORDER BY id LIMIT 1",
                JOB_COLUMNS
            ),
            params![client_id, title],
            row_to_job,
        );

        match result {
            Ok(job) => Ok(Some(job)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List jobs, optionally filtered by status and/or client.
    pub fn list_jobs(
        &self,
        status: Option<JobStatus>,
        client_id: Option<ClientId>,
    ) -> DbResult<Vec<Job>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM jobs
             WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR client_id = ?2)
             ORDER BY id DESC",
            JOB_COLUMNS
        ))?;
        let rows = stmt.query_map(params![status.map(|s| s.as_str()), client_id], row_to_job)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Apply a field diff to a job and persist it.
    pub fn update_job(&self, id: JobId, update: &JobUpdate) -> DbResult<Job> {
        let mut job = self.get_job(id)?;
        update.apply(&mut job);

        if job.title.trim().is_empty() {
            return Err(DbError::InvalidInput("job title is required".to_string()));
        }

        self.save_job(&job)?;
        Ok(job)
    }

    /// Change a job's status.
    pub fn set_job_status(&self, id: JobId, status: JobStatus) -> DbResult<Job> {
        let mut job = self.get_job(id)?;
        job.set_status(status);
        self.save_job(&job)?;
        Ok(job)
    }

    fn save_job(&self, job: &Job) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE jobs
            SET client_id = ?2, title = ?3, modality = ?4, opened_on = ?5, closed_on = ?6,
                status = ?7, description = ?8
            WHERE id = ?1
            "#,
            params![
                job.id,
                job.client_id,
                job.title.trim(),
                non_blank(&job.modality),
                date_to_sql(job.opened_on),
                date_to_sql(job.closed_on),
                job.status.as_str(),
                non_blank(&job.description),
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Job not found: {}", job.id)));
        }

        Ok(())
    }
}

fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
    let status_str: String = row.get(6)?;

    Ok(Job {
        id: row.get(0)?,
        client_id: row.get(1)?,
        title: row.get(2)?,
        modality: row.get(3)?,
        opened_on: date_from_sql(row.get(4)?),
        closed_on: date_from_sql(row.get(5)?),
        status: JobStatus::from_str(&status_str).unwrap_or_default(),
        description: row.get(7)?,
    })
}
