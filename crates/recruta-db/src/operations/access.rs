//! Access grants to client systems.

use super::{date_from_sql, date_to_sql, non_blank};
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{
    catalog_system, AccessGrant, AccessGrantId, AccessStatus, CandidateId, ClientId,
};
use rusqlite::params;

const ACCESS_COLUMNS: &str = "id, client_id, client_name, candidate_id, candidate_name, system, \
     access_type, starts_on, ends_on, status, notes";

impl Database {
    /// Record an access grant. The system must be one of the catalog entries.
    pub fn create_access_grant(&self, grant: &AccessGrant) -> DbResult<AccessGrantId> {
        let system = catalog_system(&grant.system).ok_or_else(|| {
            DbError::InvalidInput(format!("unknown system: {}", grant.system.trim()))
        })?;
        if grant.client_name.trim().is_empty() || grant.candidate_name.trim().is_empty() {
            return Err(DbError::InvalidInput(
                "client and candidate are required".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO access_grants (client_id, client_name, candidate_id, candidate_name,
                                       system, access_type, starts_on, ends_on, status, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                grant.client_id,
                grant.client_name.trim(),
                grant.candidate_id,
                grant.candidate_name.trim(),
                system,
                non_blank(&grant.access_type),
                date_to_sql(grant.starts_on),
                date_to_sql(grant.ends_on),
                grant.status.as_str(),
                non_blank(&grant.notes),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get an access grant by ID.
    pub fn get_access_grant(&self, id: AccessGrantId) -> DbResult<AccessGrant> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM access_grants WHERE id = ?1", ACCESS_COLUMNS),
            params![id],
            row_to_grant,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Access grant not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List grants, optionally filtered by client and/or candidate.
    pub fn list_access_grants(
        &self,
        client_id: Option<ClientId>,
        candidate_id: Option<CandidateId>,
    ) -> DbResult<Vec<AccessGrant>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM access_grants
             WHERE (?1 IS NULL OR client_id = ?1) AND (?2 IS NULL OR candidate_id = ?2)
             ORDER BY id DESC",
            ACCESS_COLUMNS
        ))?;
        let rows = stmt.query_map(params![client_id, candidate_id], row_to_grant)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Change a grant's status. Revoking stamps the end date when it is unset.
    pub fn set_access_status(
        &self,
        id: AccessGrantId,
        status: AccessStatus,
    ) -> DbResult<AccessGrant> {
        let mut grant = self.get_access_grant(id)?;
        grant.status = status;
        if status == AccessStatus::Revoked && grant.ends_on.is_none() {
            grant.ends_on = Some(recruta_core::today());
        }

        {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE access_grants SET status = ?2, ends_on = ?3 WHERE id = ?1",
                params![id, status.as_str(), date_to_sql(grant.ends_on)],
            )?;
        }

        Ok(grant)
    }
}

fn row_to_grant(row: &rusqlite::Row) -> rusqlite::Result<AccessGrant> {
    let status_str: String = row.get(9)?;

    Ok(AccessGrant {
        id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        candidate_id: row.get(3)?,
        candidate_name: row.get(4)?,
        system: row.get(5)?,
        access_type: row.get(6)?,
        starts_on: date_from_sql(row.get(7)?),
        ends_on: date_from_sql(row.get(8)?),
        status: AccessStatus::from_str(&status_str).unwrap_or_default(),
        notes: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recruta_core::{Candidate, Client};

    #[test]
    fn test_grant_lifecycle() {
        let db = Database::open_in_memory().unwrap();

        let grant = AccessGrant::new("Acme Corp", "Maria Silva", "github");
        let id = db.create_access_grant(&grant).unwrap();

        let fetched = db.get_access_grant(id).unwrap();
        assert_eq!(fetched.system, "GitHub");
        assert_eq!(fetched.status, AccessStatus::Pending);

        let active = db.set_access_status(id, AccessStatus::Active).unwrap();
        assert_eq!(active.status, AccessStatus::Active);
        assert!(active.ends_on.is_none());

        let revoked = db.set_access_status(id, AccessStatus::Revoked).unwrap();
        assert!(revoked.ends_on.is_some());
        assert_eq!(db.get_access_grant(id).unwrap().status, AccessStatus::Revoked);
    }

    #[test]
    fn test_unknown_system_rejected() {
        let db = Database::open_in_memory().unwrap();
        let grant = AccessGrant::new("Acme Corp", "Maria Silva", "Mainframe");
        assert!(matches!(
            db.create_access_grant(&grant),
            Err(DbError::InvalidInput(_))
        ));
        assert!(db.list_access_grants(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_list_grants_filter() {
        let db = Database::open_in_memory().unwrap();
        let acme = db.create_client(&Client::new("Acme Corp")).unwrap();
        let globex = db.create_client(&Client::new("Globex")).unwrap();
        let maria = db.create_candidate(&Candidate::new("Maria")).unwrap();

        let mut a = AccessGrant::new("Acme Corp", "Maria", "VPN");
        a.client_id = Some(acme);
        a.candidate_id = Some(maria);
        let mut b = AccessGrant::new("Globex", "Maria", "Slack");
        b.client_id = Some(globex);
        b.candidate_id = Some(maria);
        db.create_access_grant(&a).unwrap();
        db.create_access_grant(&b).unwrap();

        let for_acme = db.list_access_grants(Some(acme), None).unwrap();
        assert_eq!(for_acme.len(), 1);
        assert_eq!(for_acme[0].system, "VPN");
        assert_eq!(db.list_access_grants(None, Some(maria)).unwrap().len(), 2);
        assert!(db.set_access_status(99, AccessStatus::Active).unwrap_err().is_not_found());
    }

    #[test]
    fn test_grant_with_unknown_client_id_fails() {
        let db = Database::open_in_memory().unwrap();
        let mut grant = AccessGrant::new("Acme Corp", "Maria", "VPN");
        grant.client_id = Some(42);
        assert!(db.create_access_grant(&grant).is_err());
    }
}
