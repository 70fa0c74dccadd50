//! Recognition of the `SELECT` statements issued by the DevTools resources
//! panel.
//!
//! Exactly two shapes are understood, tried in this order:
//!
//! 1. `SELECT <column>[, <column>...] FROM <table>`
//! 2. `SELECT [rowid,] * FROM <table>`
//!
//! Keywords are case-insensitive, the table name may be wrapped in double
//! quotes, and runs of whitespace are collapsed before matching. Anything
//! else is not supported. This is not, and should not become, a SQL parser.

use std::sync::LazyLock;

use regex::Regex;
use vitrine_store::Store;

use crate::InspectorError;

/// Message returned for statements outside the recognised shapes
pub const UNSUPPORTED_QUERY: &str = "Query not supported";

/// Name of the synthetic, zero-based row index column
pub const ROWID: &str = "rowid";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static SELECT_COLUMNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)^SELECT ((?:\w+, ?)*\w+) FROM "?(\w+)"?$"#)
        .expect("column select pattern is valid")
});

static SELECT_ALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)^SELECT (?:rowid, ?)?\* FROM "?(\w+)"?$"#)
        .expect("wildcard select pattern is valid")
});

/// What a recognised statement asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// The table to read
    pub table_name: String,
    /// Columns in output order; always starts with [`ROWID`]
    pub columns: Vec<String>,
    /// Whether the columns came from the table schema (`*`)
    pub is_wildcard: bool,
}

/// Collapse every run of whitespace to one space and trim the ends
pub fn normalize(query: &str) -> String {
    WHITESPACE.replace_all(query, " ").trim().to_owned()
}

/// Recognise `query` against the tables of `store`.
///
/// Fails with [`InspectorError::UnsupportedQuery`] when neither shape
/// matches or the table does not exist. Explicit column names are not
/// checked here; unknown ones fail when rows are read.
pub fn parse_query<S>(store: &S, query: &str) -> Result<ParsedQuery, InspectorError>
where
    S: Store,
{
    let query = normalize(query);

    let (table_name, mut columns, is_wildcard) =
        if let Some(captures) = SELECT_COLUMNS.captures(&query) {
            let columns = WHITESPACE
                .replace_all(&captures[1], "")
                .split(',')
                .map(str::to_owned)
                .collect::<Vec<_>>();
            let table_name = captures[2].to_owned();
            if store.table_schema(&table_name).is_none() {
                return Err(InspectorError::UnsupportedQuery);
            }
            (table_name, columns, false)
        } else if let Some(captures) = SELECT_ALL.captures(&query) {
            let table_name = captures[1].to_owned();
            let schema = store
                .table_schema(&table_name)
                .ok_or(InspectorError::UnsupportedQuery)?;
            (table_name, schema.field_names(), true)
        } else {
            return Err(InspectorError::UnsupportedQuery);
        };

    if columns.first().map(String::as_str) != Some(ROWID) {
        columns.insert(0, ROWID.to_owned());
    }

    Ok(ParsedQuery {
        table_name,
        columns,
        is_wildcard,
    })
}
