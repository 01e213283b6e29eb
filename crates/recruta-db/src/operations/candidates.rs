//! Candidate repository.

use super::{date_from_sql, non_blank};
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{today, Candidate, CandidateId, CandidateUpdate, DATE_FORMAT};
use rusqlite::params;

const CANDIDATE_COLUMNS: &str = "id, name, age, city, phone, email, linkedin_url, desired_role, \
     salary_expectation, registered_on, resume_path";

impl Database {
    /// Register a candidate, returning the assigned id.
    ///
    /// The name is required; blank optional fields are stored as absent.
    pub fn create_candidate(&self, candidate: &Candidate) -> DbResult<CandidateId> {
        let name = candidate.name.trim();
        if name.is_empty() {
            return Err(DbError::InvalidInput("candidate name is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO candidates (name, age, city, phone, email, linkedin_url, desired_role,
                                    salary_expectation, registered_on, resume_path)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                name,
                candidate.age,
                non_blank(&candidate.city),
                non_blank(&candidate.phone),
                non_blank(&candidate.email),
                non_blank(&candidate.linkedin_url),
                non_blank(&candidate.desired_role),
                non_blank(&candidate.salary_expectation),
                candidate.registered_on.format(DATE_FORMAT).to_string(),
                non_blank(&candidate.resume_path),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a candidate by ID.
    pub fn get_candidate(&self, id: CandidateId) -> DbResult<Candidate> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM candidates WHERE id = ?1", CANDIDATE_COLUMNS),
            params![id],
            row_to_candidate,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Candidate not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Find a candidate by exact, case-sensitive name. The oldest record wins.
    pub fn find_candidate_by_name(&self, name: &str) -> DbResult<Option<Candidate>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM candidates WHERE name = ?1 ORDER BY id LIMIT 1",
                CANDIDATE_COLUMNS
            ),
            params![name],
            row_to_candidate,
        );

        match result {
            Ok(candidate) => Ok(Some(candidate)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List candidates ordered by name.
    pub fn list_candidates(&self, limit: Option<i64>) -> DbResult<Vec<Candidate>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM candidates ORDER BY name, id LIMIT ?1",
            CANDIDATE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit.unwrap_or(-1)], row_to_candidate)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Candidates whose name contains the fragment (ASCII case-insensitive).
    pub fn search_candidates(&self, fragment: &str) -> DbResult<Vec<Candidate>> {
        let conn = self.conn()?;
        let pattern = format!("%{}%", fragment.trim());
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM candidates WHERE name LIKE ?1 ORDER BY name, id",
            CANDIDATE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![pattern], row_to_candidate)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Apply a field diff to a candidate and persist it.
    pub fn update_candidate(
        &self,
        id: CandidateId,
        update: &CandidateUpdate,
    ) -> DbResult<Candidate> {
        let mut candidate = self.get_candidate(id)?;
        update.apply(&mut candidate);

        if candidate.name.trim().is_empty() {
            return Err(DbError::InvalidInput("candidate name is required".to_string()));
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE candidates
            SET name = ?2, age = ?3, city = ?4, phone = ?5, email = ?6, linkedin_url = ?7,
                desired_role = ?8, salary_expectation = ?9, resume_path = ?10
            WHERE id = ?1
            "#,
            params![
                id,
                candidate.name.trim(),
                candidate.age,
                non_blank(&candidate.city),
                non_blank(&candidate.phone),
                non_blank(&candidate.email),
                non_blank(&candidate.linkedin_url),
                non_blank(&candidate.desired_role),
                non_blank(&candidate.salary_expectation),
                non_blank(&candidate.resume_path),
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Candidate not found: {}", id)));
        }

        Ok(candidate)
    }
}

fn row_to_candidate(row: &rusqlite::Row) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        city: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        linkedin_url: row.get(6)?,
        desired_role: row.get(7)?,
        salary_expectation: row.get(8)?,
        registered_on: date_from_sql(row.get(9)?).unwrap_or_else(today),
        resume_path: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_crud() {
        let db = Database::open_in_memory().unwrap();

        let id = db
            .create_candidate(&Candidate::new("Maria Silva").with_city("Curitiba"))
            .unwrap();
        assert!(id > 0);

        let fetched = db.get_candidate(id).unwrap();
        assert_eq!(fetched.name, "Maria Silva");
        assert_eq!(fetched.city.as_deref(), Some("Curitiba"));
        assert_eq!(fetched.age, None);

        let update = CandidateUpdate {
            email: Some("maria@example.com".to_string()),
            ..Default::default()
        };
        let updated = db.update_candidate(id, &update).unwrap();
        assert_eq!(updated.email.as_deref(), Some("maria@example.com"));
        assert_eq!(updated.city.as_deref(), Some("Curitiba"));

        let all = db.list_candidates(None).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = Database::open_in_memory().unwrap();

        let err = db.create_candidate(&Candidate::new("   ")).unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert!(db.list_candidates(None).unwrap().is_empty());

        let id = db.create_candidate(&Candidate::new("Ana")).unwrap();
        let update = CandidateUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(db.update_candidate(id, &update).is_err());
        assert_eq!(db.get_candidate(id).unwrap().name, "Ana");
    }

    #[test]
    fn test_update_missing_candidate() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .update_candidate(42, &CandidateUpdate::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_by_name_is_exact() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_candidate(&Candidate::new("João Souza")).unwrap();

        assert_eq!(db.find_candidate_by_name("João Souza").unwrap().unwrap().id, id);
        assert!(db.find_candidate_by_name("joão souza").unwrap().is_none());
        assert!(db.find_candidate_by_name("Joao Souza").unwrap().is_none());
    }

    #[test]
    fn test_search_candidates() {
        let db = Database::open_in_memory().unwrap();
        db.create_candidate(&Candidate::new("Maria Silva")).unwrap();
        db.create_candidate(&Candidate::new("Mariana Costa")).unwrap();
        db.create_candidate(&Candidate::new("Pedro Alves")).unwrap();

        let found = db.search_candidates("maria").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Maria Silva");
    }
}
