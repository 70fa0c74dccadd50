//! Wire records of the DevTools `Database` domain.
//!
//! Field names follow the DevTools protocol, so every record serializes in
//! camelCase.

use serde::{Deserialize, Serialize};

use crate::{DatabaseDescriptor, InspectorError, ResultSet};

/// Name of the domain as DevTools addresses it
pub const DATABASE_DOMAIN: &str = "Database";

/// Event pushed to a peer for every discovered database
pub const ADD_DATABASE_EVENT: &str = "Database.addDatabase";

/// A discovered database, as announced to DevTools
pub type DatabaseObject = DatabaseDescriptor;

/// Parameters of [`ADD_DATABASE_EVENT`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDatabaseEvent {
    /// The database that was found
    pub database: DatabaseObject,
}

/// Parameters of `Database.getDatabaseTableNames`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseTableNamesRequest {
    /// Path announced in a prior [`AddDatabaseEvent`]
    pub database_id: String,
}

/// Result of `Database.getDatabaseTableNames`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseTableNamesResponse {
    /// Table names in schema order
    pub table_names: Vec<String>,
}

/// Parameters of `Database.executeSQL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSqlRequest {
    /// Path announced in a prior [`AddDatabaseEvent`]
    pub database_id: String,
    /// Query text
    pub query: String,
}

/// Result of `Database.executeSQL`: either a result set or an error, never
/// both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSqlResponse {
    /// Column headers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
    /// Cell text, row-major
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Why the query produced no result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_error: Option<SqlError>,
}

impl From<ResultSet> for ExecuteSqlResponse {
    fn from(result: ResultSet) -> Self {
        Self {
            column_names: Some(result.column_names),
            values: Some(result.values),
            sql_error: None,
        }
    }
}

impl From<InspectorError> for ExecuteSqlResponse {
    fn from(error: InspectorError) -> Self {
        Self {
            sql_error: Some(SqlError::new(error.to_string())),
            ..Default::default()
        }
    }
}

/// A query failure reported in-band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlError {
    /// Explanation shown by DevTools
    pub message: String,
    /// Always `0`; DevTools only displays the message
    pub code: i32,
}

impl SqlError {
    /// An error with the given message and code `0`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::UNSUPPORTED_QUERY;

    #[test]
    fn it_omits_absent_fields_of_sql_responses() -> anyhow::Result<()> {
        let failed = ExecuteSqlResponse::from(InspectorError::UnsupportedQuery);
        assert_eq!(
            serde_json::to_value(&failed)?,
            json!({ "sqlError": { "message": UNSUPPORTED_QUERY, "code": 0 } })
        );

        let succeeded = ExecuteSqlResponse::from(ResultSet {
            column_names: vec!["rowid".into()],
            values: vec!["0".into()],
        });
        assert_eq!(
            serde_json::to_value(&succeeded)?,
            json!({ "columnNames": ["rowid"], "values": ["0"] })
        );
        Ok(())
    }

    #[test]
    fn it_reads_camel_case_requests() -> anyhow::Result<()> {
        let request: ExecuteSqlRequest = serde_json::from_value(json!({
            "databaseId": "/data/library.vdb",
            "query": "SELECT * FROM Book"
        }))?;

        assert_eq!(request.database_id, "/data/library.vdb");
        assert_eq!(request.query, "SELECT * FROM Book");
        Ok(())
    }
}
