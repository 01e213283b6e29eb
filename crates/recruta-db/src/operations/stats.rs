//! Registry statistics.

use crate::database::Database;
use crate::error::DbResult;
use recruta_core::RegistryStats;
use rusqlite::Connection;
use std::collections::HashMap;

impl Database {
    /// Row counts across the registry.
    pub fn get_stats(&self) -> DbResult<RegistryStats> {
        let conn = self.conn()?;

        let count = |sql: &str| -> DbResult<i64> {
            Ok(conn.query_row(sql, [], |row| row.get(0))?)
        };

        let candidates = count("SELECT COUNT(*) FROM candidates")?;
        let clients = count("SELECT COUNT(*) FROM clients")?;
        let jobs = count("SELECT COUNT(*) FROM jobs")?;
        let open_jobs = count("SELECT COUNT(*) FROM jobs WHERE status IN ('open', 'in_progress')")?;
        let links = count("SELECT COUNT(*) FROM job_candidates")?;
        let assessments = count("SELECT COUNT(*) FROM assessments")?;
        let active_access_grants =
            count("SELECT COUNT(*) FROM access_grants WHERE status = 'active'")?;
        let financial_records = count("SELECT COUNT(*) FROM financial_records")?;

        let links_by_stage = grouped(
            &conn,
            "SELECT stage, COUNT(*) FROM job_candidates GROUP BY stage",
        )?;
        let assessments_by_format = grouped(
            &conn,
            "SELECT source_format, COUNT(*) FROM assessments GROUP BY source_format",
        )?;

        // page_count * page_size, valid for in-memory databases too
        let page_count: i64 = conn.pragma_query_value(None, "page_count", |row| row.get(0))?;
        let page_size: i64 = conn.pragma_query_value(None, "page_size", |row| row.get(0))?;

        Ok(RegistryStats {
            candidates,
            clients,
            jobs,
            open_jobs,
            links,
            links_by_stage,
            assessments,
            assessments_by_format,
            active_access_grants,
            financial_records,
            database_size_bytes: page_count * page_size,
        })
    }
}

fn grouped(conn: &Connection, sql: &str) -> DbResult<HashMap<String, i64>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        let key: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        Ok((key, count))
    })?;

    let mut map = HashMap::new();
    for row in rows {
        let (key, count) = row?;
        map.insert(key, count);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruta_core::{Assessment, Candidate, Job, JobStatus, PipelineStage, SourceFormat};

    #[test]
    fn test_get_stats() {
        let db = Database::open_in_memory().unwrap();

        let maria = db.create_candidate(&Candidate::new("Maria")).unwrap();
        let joao = db.create_candidate(&Candidate::new("João")).unwrap();
        let job = db.create_job(&Job::new("Analista")).unwrap();
        let closed = db.create_job(&Job::new("QA")).unwrap();
        db.set_job_status(closed, JobStatus::Closed).unwrap();

        db.link(job, maria, None).unwrap();
        db.link(job, joao, None).unwrap();
        db.set_stage(job, joao, PipelineStage::Interview).unwrap();

        db.create_assessment(&Assessment::new("Maria", SourceFormat::Pdf).with_source_path("/a.pdf"))
            .unwrap();
        db.create_assessment(&Assessment::new("João", SourceFormat::Manual))
            .unwrap();

        let stats = db.get_stats().unwrap();
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.jobs, 2);
        assert_eq!(stats.open_jobs, 1);
        assert_eq!(stats.links, 2);
        assert_eq!(stats.links_by_stage.get("in_review"), Some(&1));
        assert_eq!(stats.links_by_stage.get("interview"), Some(&1));
        assert_eq!(stats.assessments, 2);
        assert_eq!(stats.assessments_by_format.get("pdf"), Some(&1));
        assert_eq!(stats.active_access_grants, 0);
        assert!(stats.database_size_bytes > 0);
    }
}
