//! Client type definitions

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::{DbResult, Row};

/// A row of the `client` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Assigned by storage on insert, never by the caller
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Set by storage on insert, immutable afterwards
    pub created_at: NaiveDateTime,
}

impl Client {
    /// Map a result row onto a client, column by column
    pub fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Client {
            id: row.get_i64("id")?,
            name: row.get_string("name")?,
            email: row.get_string("email")?,
            phone: row.get_string("phone")?,
            created_at: row.get_timestamp("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, Value};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn client_columns() -> Arc<[String]> {
        ["id", "name", "email", "phone", "created_at"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_from_row() {
        let row = Row::new(
            client_columns(),
            vec![
                Value::Int(1),
                Value::Text("Ana Silva".to_string()),
                Value::Text("ana@example.com".to_string()),
                Value::Text("11999990000".to_string()),
                Value::Text("2024-02-01 12:00:00".to_string()),
            ],
        );

        let client = Client::from_row(&row).unwrap();
        assert_eq!(client.id, 1);
        assert_eq!(client.name, "Ana Silva");
        assert_eq!(client.email, "ana@example.com");
        assert_eq!(client.phone, "11999990000");
        assert_eq!(client.created_at.to_string(), "2024-02-01 12:00:00");
    }

    #[test]
    fn test_from_row_rejects_null_name() {
        let row = Row::new(
            client_columns(),
            vec![
                Value::Int(1),
                Value::Null,
                Value::Text("ana@example.com".to_string()),
                Value::Text("11999990000".to_string()),
                Value::Text("2024-02-01 12:00:00".to_string()),
            ],
        );

        assert_matches!(
            Client::from_row(&row),
            Err(DbError::Mapping { ref column, .. }) if column == "name"
        );
    }

    #[test]
    fn test_serializes_column_names() {
        let client = Client {
            id: 3,
            name: "Bruno".to_string(),
            email: "bruno@example.com".to_string(),
            phone: "2133334444".to_string(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["created_at"], "2024-01-01T00:00:00");
        assert!(json.get("createdAt").is_none());
    }
}
