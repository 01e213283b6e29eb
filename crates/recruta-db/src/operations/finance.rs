//! Service orders, quotes and invoices.

use super::{date_from_sql, date_to_sql, non_blank};
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{ClientId, FinanceKind, FinanceStatus, FinancialRecord, FinancialRecordId};
use rusqlite::params;

const FINANCE_COLUMNS: &str =
    "id, kind, client_id, client_name, description, issued_on, due_on, amount, status, notes";

impl Database {
    /// Record a financial document, returning the assigned id.
    pub fn create_financial_record(&self, record: &FinancialRecord) -> DbResult<FinancialRecordId> {
        if record.client_name.trim().is_empty() {
            return Err(DbError::InvalidInput("client is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO financial_records (kind, client_id, client_name, description, issued_on,
                                           due_on, amount, status, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.kind.as_str(),
                record.client_id,
                record.client_name.trim(),
                record.description,
                date_to_sql(record.issued_on),
                date_to_sql(record.due_on),
                record.amount.trim(),
                record.status.as_str(),
                non_blank(&record.notes),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a financial record by ID.
    pub fn get_financial_record(&self, id: FinancialRecordId) -> DbResult<FinancialRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM financial_records WHERE id = ?1",
                FINANCE_COLUMNS
            ),
            params![id],
            row_to_record,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Financial record not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List records, optionally filtered by kind and/or client.
    pub fn list_financial_records(
        &self,
        kind: Option<FinanceKind>,
        client_id: Option<ClientId>,
    ) -> DbResult<Vec<FinancialRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM financial_records
             WHERE (?1 IS NULL OR kind = ?1) AND (?2 IS NULL OR client_id = ?2)
             ORDER BY issued_on DESC, id DESC",
            FINANCE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![kind.map(|k| k.as_str()), client_id], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Change a record's status.
    pub fn set_finance_status(
        &self,
        id: FinancialRecordId,
        status: FinanceStatus,
    ) -> DbResult<FinancialRecord> {
        {
            let conn = self.conn()?;
            let rows = conn.execute(
                "UPDATE financial_records SET status = ?2 WHERE id = ?1",
                params![id, status.as_str()],
            )?;

            if rows == 0 {
                return Err(DbError::NotFound(format!(
                    "Financial record not found: {}",
                    id
                )));
            }
        }

        self.get_financial_record(id)
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FinancialRecord> {
    let kind_str: String = row.get(1)?;
    let status_str: String = row.get(8)?;

    Ok(FinancialRecord {
        id: row.get(0)?,
        kind: FinanceKind::from_str(&kind_str).unwrap_or(FinanceKind::ServiceOrder),
        client_id: row.get(2)?,
        client_name: row.get(3)?,
        description: row.get(4)?,
        issued_on: date_from_sql(row.get(5)?),
        due_on: date_from_sql(row.get(6)?),
        amount: row.get(7)?,
        status: FinanceStatus::from_str(&status_str).unwrap_or_default(),
        notes: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_is_kept_verbatim() {
        let db = Database::open_in_memory().unwrap();

        let mut record = FinancialRecord::new(FinanceKind::Invoice, "Acme Corp", "3.500,00");
        record.description = "Recrutamento Analista".to_string();
        let id = db.create_financial_record(&record).unwrap();

        let fetched = db.get_financial_record(id).unwrap();
        assert_eq!(fetched.amount, "3.500,00");
        assert_eq!(fetched.kind, FinanceKind::Invoice);
        assert_eq!(fetched.status, FinanceStatus::Open);

        let paid = db.set_finance_status(id, FinanceStatus::Paid).unwrap();
        assert_eq!(paid.status, FinanceStatus::Paid);
    }

    #[test]
    fn test_list_by_kind() {
        let db = Database::open_in_memory().unwrap();
        db.create_financial_record(&FinancialRecord::new(FinanceKind::Quote, "Acme", "1.000,00"))
            .unwrap();
        db.create_financial_record(&FinancialRecord::new(
            FinanceKind::ServiceOrder,
            "Acme",
            "2.000,00",
        ))
        .unwrap();

        assert_eq!(db.list_financial_records(None, None).unwrap().len(), 2);
        assert_eq!(
            db.list_financial_records(Some(FinanceKind::Quote), None)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_missing_record() {
        let db = Database::open_in_memory().unwrap();
        assert!(db
            .set_finance_status(5, FinanceStatus::Cancelled)
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            db.create_financial_record(&FinancialRecord::new(FinanceKind::Quote, " ", "1")),
            Err(DbError::InvalidInput(_))
        ));
    }
}
