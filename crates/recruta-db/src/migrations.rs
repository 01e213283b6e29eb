//! Database migrations and schema management.

use crate::error::DbResult;
use rusqlite::Connection;
use tracing::info;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> DbResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating initial database schema...");
        create_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(crate::error::DbError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> DbResult<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn create_initial_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- Talent pool
        CREATE TABLE IF NOT EXISTS candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER,
            city TEXT,
            phone TEXT,
            email TEXT,
            linkedin_url TEXT,
            desired_role TEXT,
            salary_expectation TEXT,
            registered_on TEXT NOT NULL,
            resume_path TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_candidates_name ON candidates(name);

        -- Client companies
        CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            legal_name TEXT,
            tax_id TEXT,
            city TEXT,
            contact TEXT,
            phone TEXT,
            email TEXT,
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_clients_name ON clients(name);

        -- Job openings
        CREATE TABLE IF NOT EXISTS jobs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER REFERENCES clients(id),
            title TEXT NOT NULL,
            modality TEXT,
            opened_on TEXT,
            closed_on TEXT,
            status TEXT NOT NULL DEFAULT 'open',
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_jobs_client_title ON jobs(client_id, title);
        CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);

        -- Hiring pipeline: one row per job x candidate
        CREATE TABLE IF NOT EXISTS job_candidates (
            job_id INTEGER NOT NULL REFERENCES jobs(id),
            candidate_id INTEGER NOT NULL REFERENCES candidates(id),
            linked_at TEXT NOT NULL,
            note TEXT,
            stage TEXT NOT NULL DEFAULT 'in_review',
            outcome TEXT NOT NULL DEFAULT 'pending',
            decline_reason TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (job_id, candidate_id)
        );

        CREATE INDEX IF NOT EXISTS idx_job_candidates_candidate ON job_candidates(candidate_id);

        -- Assessment log (pareceres)
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id INTEGER REFERENCES jobs(id),
            candidate_id INTEGER REFERENCES candidates(id),
            created_at TEXT NOT NULL,
            client_name TEXT NOT NULL DEFAULT '',
            job_title TEXT NOT NULL DEFAULT '',
            candidate_name TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '',
            age TEXT NOT NULL DEFAULT '',
            salary_expectation TEXT NOT NULL DEFAULT '',
            linkedin_url TEXT NOT NULL DEFAULT '',
            summary TEXT NOT NULL DEFAULT '',
            analysis TEXT NOT NULL DEFAULT '',
            conclusion TEXT NOT NULL DEFAULT '',
            source_format TEXT NOT NULL,
            source_path TEXT,
            stage TEXT NOT NULL DEFAULT 'in_review',
            outcome TEXT NOT NULL DEFAULT 'pending',
            decline_reason TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_assessments_candidate ON assessments(candidate_id);
        CREATE INDEX IF NOT EXISTS idx_assessments_job ON assessments(job_id);

        -- An imported PDF has at most one assessment
        CREATE UNIQUE INDEX IF NOT EXISTS idx_assessments_pdf_path
            ON assessments(source_path) WHERE source_format = 'pdf';

        -- Access to client systems
        CREATE TABLE IF NOT EXISTS access_grants (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER REFERENCES clients(id),
            client_name TEXT NOT NULL,
            candidate_id INTEGER REFERENCES candidates(id),
            candidate_name TEXT NOT NULL,
            system TEXT NOT NULL,
            access_type TEXT,
            starts_on TEXT,
            ends_on TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_access_grants_status ON access_grants(status);

        -- Service orders, quotes and invoices
        CREATE TABLE IF NOT EXISTS financial_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            client_id INTEGER REFERENCES clients(id),
            client_name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            issued_on TEXT,
            due_on TEXT,
            amount TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'open',
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_financial_records_kind ON financial_records(kind);
        "#,
    )?;

    Ok(())
}
