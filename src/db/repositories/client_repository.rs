//! Client repository for database operations

use crate::db::{ConnectionProvider, Connection, DbError, DbResult, Value};
use crate::types::Client;

const SELECT_CLIENT: &str = "SELECT id, name, email, phone, created_at FROM client";

/// CRUD operations on the `client` table.
///
/// Every operation opens its own connection through the provider, runs one
/// statement and drops the connection before returning.
pub struct ClientRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> ClientRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// All clients in storage order (no ORDER BY).
    pub fn list_all(&self) -> DbResult<Vec<Client>> {
        let mut conn = self.provider.get_connection()?;
        let rows = conn.query(SELECT_CLIENT, &[])?;

        rows.iter().map(Client::from_row).collect()
    }

    pub fn find_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let mut conn = self.provider.get_connection()?;
        let rows = conn.query(&format!("{} WHERE id = ?", SELECT_CLIENT), &[Value::Int(id)])?;

        rows.first().map(Client::from_row).transpose()
    }

    /// Insert a client and return the storage-assigned id. Input is not validated.
    pub fn create(&self, name: &str, email: &str, phone: &str) -> DbResult<i64> {
        let mut conn = self.provider.get_connection()?;
        let result = conn.execute(
            "INSERT INTO client (name, email, phone) VALUES (?, ?, ?)",
            &[name.into(), email.into(), phone.into()],
        )?;

        let id = result
            .last_insert_id
            .ok_or_else(|| DbError::query("insert did not report a generated id"))?;

        tracing::info!("Created client {} <{}>", id, email);
        Ok(id)
    }

    /// Returns the number of rows matched; 0 means no client has that id.
    pub fn update_phone(&self, id: i64, phone: &str) -> DbResult<u64> {
        let mut conn = self.provider.get_connection()?;
        let result = conn.execute(
            "UPDATE client SET phone = ? WHERE id = ?",
            &[phone.into(), Value::Int(id)],
        )?;

        if result.affected_rows == 0 {
            tracing::info!("No client with id {} to update", id);
        } else {
            tracing::info!("Updated phone for client {}", id);
        }

        Ok(result.affected_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_client_table;
    use crate::db::SqliteConnectionProvider;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn create_test_repo() -> (ClientRepository<SqliteConnectionProvider>, TempDir) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let provider = SqliteConnectionProvider::create_if_missing(temp_dir.path().join("clients.db"));

        let mut conn = provider.get_connection().unwrap();
        create_client_table(&mut conn, provider.dialect()).unwrap();
        drop(conn);

        (ClientRepository::new(provider), temp_dir)
    }

    #[test]
    fn test_list_all_empty() {
        let (repo, _temp_dir) = create_test_repo();
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let (repo, _temp_dir) = create_test_repo();

        let first = repo.create("Ana Silva", "ana@example.com", "11999990000").unwrap();
        let second = repo.create("Bruno Lima", "bruno@example.com", "21988887777").unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_create_then_list() {
        let (repo, _temp_dir) = create_test_repo();

        let id = repo.create("Ana Silva", "ana@example.com", "11999990000").unwrap();
        let clients = repo.list_all().unwrap();

        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id, id);
        assert_eq!(clients[0].name, "Ana Silva");
        assert_eq!(clients[0].email, "ana@example.com");
        assert_eq!(clients[0].phone, "11999990000");
    }

    #[test]
    fn test_update_phone() {
        let (repo, _temp_dir) = create_test_repo();
        let id = repo.create("Ana Silva", "ana@example.com", "11999990000").unwrap();
        let before = repo.find_by_id(id).unwrap().unwrap();

        assert_eq!(repo.update_phone(id, "11888887777").unwrap(), 1);

        let after = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(after.phone, "11888887777");
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_update_phone_same_value_still_matches() {
        let (repo, _temp_dir) = create_test_repo();
        let id = repo.create("Ana Silva", "ana@example.com", "11999990000").unwrap();

        assert_eq!(repo.update_phone(id, "11999990000").unwrap(), 1);
    }

    #[test]
    fn test_update_phone_missing_id_returns_zero() {
        let (repo, _temp_dir) = create_test_repo();
        repo.create("Ana Silva", "ana@example.com", "11999990000").unwrap();
        let before = repo.list_all().unwrap();

        assert_eq!(repo.update_phone(999, "000").unwrap(), 0);
        assert_eq!(repo.list_all().unwrap(), before);
    }

    #[test]
    fn test_find_by_id_not_found() {
        let (repo, _temp_dir) = create_test_repo();
        assert!(repo.find_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_create_passes_input_through_unvalidated() {
        let (repo, _temp_dir) = create_test_repo();

        let id = repo.create("Robert'); DROP TABLE client;--", "", "").unwrap();

        let stored = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "Robert'); DROP TABLE client;--");
        assert_eq!(stored.email, "");
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_table_is_query_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = ClientRepository::new(SqliteConnectionProvider::create_if_missing(
            temp_dir.path().join("empty.db"),
        ));

        assert_matches!(repo.list_all(), Err(DbError::Query(_)));
        assert_matches!(repo.create("a", "b", "c"), Err(DbError::Query(_)));
        assert_matches!(repo.update_phone(1, "x"), Err(DbError::Query(_)));
    }

    #[test]
    fn test_mistyped_path_is_connection_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("typo.db");
        let repo = ClientRepository::new(SqliteConnectionProvider::new(&db_path));

        let err = repo.list_all().unwrap_err();
        assert!(err.is_connection_error(), "unexpected error: {}", err);
        assert!(!db_path.exists());
    }

    #[test]
    fn test_repository_over_borrowed_provider() {
        let temp_dir = tempfile::tempdir().unwrap();
        let provider = SqliteConnectionProvider::create_if_missing(temp_dir.path().join("borrowed.db"));
        let mut conn = provider.get_connection().unwrap();
        create_client_table(&mut conn, provider.dialect()).unwrap();
        drop(conn);

        let repo = ClientRepository::new(&provider);
        repo.create("Carla", "carla@example.com", "31977776666").unwrap();

        assert_eq!(repo.list_all().unwrap().len(), 1);
    }
}
