//! Client repository.

use super::non_blank;
use crate::database::Database;
use crate::error::{DbError, DbResult};
use recruta_core::{Client, ClientId, ClientUpdate};
use rusqlite::params;

const CLIENT_COLUMNS: &str = "id, name, legal_name, tax_id, city, contact, phone, email, notes";

impl Database {
    /// Create a client, returning the assigned id.
    pub fn create_client(&self, client: &Client) -> DbResult<ClientId> {
        let name = client.name.trim();
        if name.is_empty() {
            return Err(DbError::InvalidInput("client name is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO clients (name, legal_name, tax_id, city, contact, phone, email, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                name,
                non_blank(&client.legal_name),
                non_blank(&client.tax_id),
                non_blank(&client.city),
                non_blank(&client.contact),
                non_blank(&client.phone),
                non_blank(&client.email),
                non_blank(&client.notes),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a client by ID.
    pub fn get_client(&self, id: ClientId) -> DbResult<Client> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM clients WHERE id = ?1", CLIENT_COLUMNS),
            params![id],
            row_to_client,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Client not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Find a client by exact display name. The oldest record wins.
    pub fn find_client_by_name(&self, name: &str) -> DbResult<Option<Client>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM clients WHERE name = ?1 ORDER BY id LIMIT 1",
                CLIENT_COLUMNS
            ),
            params![name],
            row_to_client,
        );

        match result {
            Ok(client) => Ok(Some(client)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::from(e)),
        }
    }

    /// List all clients ordered by name.
    pub fn list_clients(&self) -> DbResult<Vec<Client>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM clients ORDER BY name, id",
            CLIENT_COLUMNS
        ))?;
        let rows = stmt.query_map([], row_to_client)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Apply a field diff to a client and persist it.
    pub fn update_client(&self, id: ClientId, update: &ClientUpdate) -> DbResult<Client> {
        let mut client = self.get_client(id)?;
        update.apply(&mut client);

        if client.name.trim().is_empty() {
            return Err(DbError::InvalidInput("client name is required".to_string()));
        }

        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            UPDATE clients
            SET name = ?2, legal_name = ?3, tax_id = ?4, city = ?5, contact = ?6,
                phone = ?7, email = ?8, notes = ?9
            WHERE id = ?1
            "#,
            params![
                id,
                client.name.trim(),
                non_blank(&client.legal_name),
                non_blank(&client.tax_id),
                non_blank(&client.city),
                non_blank(&client.contact),
                non_blank(&client.phone),
                non_blank(&client.email),
                non_blank(&client.notes),
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Client not found: {}", id)));
        }

        Ok(client)
    }
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        legal_name: row.get(2)?,
        tax_id: row.get(3)?,
        city: row.get(4)?,
        contact: row.get(5)?,
        phone: row.get(6)?,
        email: row.get(7)?,
        notes: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_crud() {
        let db = Database::open_in_memory().unwrap();

        let mut client = Client::new("Acme Corp");
        client.tax_id = Some("12.345.678/0001-90".to_string());
        let id = db.create_client(&client).unwrap();

        let fetched = db.get_client(id).unwrap();
        assert_eq!(fetched.name, "Acme Corp");
        assert_eq!(fetched.tax_id.as_deref(), Some("12.345.678/0001-90"));

        let update = ClientUpdate {
            contact: Some("Fernanda".to_string()),
            ..Default::default()
        };
        let updated = db.update_client(id, &update).unwrap();
        assert_eq!(updated.contact.as_deref(), Some("Fernanda"));

        assert_eq!(db.find_client_by_name("Acme Corp").unwrap().unwrap().id, id);
        assert!(db.find_client_by_name("ACME CORP").unwrap().is_none());
        assert_eq!(db.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn test_client_name_required() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.create_client(&Client::new("")),
            Err(DbError::InvalidInput(_))
        ));
        assert!(db.get_client(1).unwrap_err().is_not_found());
    }
}
