//! Full-table reads into flat, row-major result sets.

use vitrine_store::{Store, StoreError};

use crate::{ParsedQuery, ROWID, format_cell};

/// Rows of cell text in column order.
///
/// `values` holds every row back to back: row `i` is
/// `values[i * width..(i + 1) * width]` where `width` is the number of
/// columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Column headers, starting with [`ROWID`]
    pub column_names: Vec<String>,
    /// Cell text, row-major
    pub values: Vec<String>,
}

impl ResultSet {
    /// Number of columns
    pub fn width(&self) -> usize {
        self.column_names.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        if self.column_names.is_empty() {
            0
        } else {
            self.values.len() / self.width()
        }
    }

    /// Iterate rows as slices of cell text
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.values.chunks(self.width().max(1))
    }
}

/// Read every row of the query's table, in the store's iteration order.
///
/// The [`ROWID`] column holds the row's zero-based position in that order;
/// every other column is rendered with [`format_cell`]. The first failing
/// cell aborts the whole read.
pub fn materialize<S>(store: &S, query: ParsedQuery) -> Result<ResultSet, StoreError>
where
    S: Store,
{
    let mut values = Vec::new();
    for (rowid, row) in store.rows(&query.table_name)?.enumerate() {
        for column in &query.columns {
            if column == ROWID {
                values.push(rowid.to_string());
            } else {
                values.push(format_cell(store, &row, column)?);
            }
        }
    }

    Ok(ResultSet {
        column_names: query.columns,
        values,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use vitrine_store::{OpenOptions, SnapshotStore};

    use super::*;
    use crate::{fixtures, parse_query};

    fn library() -> anyhow::Result<(tempfile::TempDir, SnapshotStore)> {
        let dir = tempfile::tempdir()?;
        let path = fixtures::library(dir.path())?;
        let store = SnapshotStore::open(&OpenOptions::for_path(Path::new(&path))?)?;
        Ok((dir, store))
    }

    #[test_log::test]
    fn it_numbers_rows_in_iteration_order() -> anyhow::Result<()> {
        let (_dir, store) = library()?;
        let result = materialize(&store, parse_query(&store, "SELECT name, index FROM Book")?)?;

        assert_eq!(result.column_names, vec!["rowid", "name", "index"]);
        assert_eq!(result.row_count(), 3);
        assert_eq!(
            result.rows().collect::<Vec<_>>(),
            vec![
                &["0", "Genesis", "0"][..],
                &["1", "Exodus", "1"][..],
                &["2", "<null>", "57"][..]
            ]
        );
        Ok(())
    }

    #[test_log::test]
    fn it_fills_every_schema_column_for_wildcards() -> anyhow::Result<()> {
        let (_dir, store) = library()?;
        let result = materialize(&store, parse_query(&store, "SELECT rowid, * FROM Author")?)?;

        assert_eq!(result.column_names, vec!["rowid", "id", "name"]);
        assert_eq!(result.values, vec!["0", "42", "Moses", "1", "7", "Paul"]);
        assert_eq!(result.values.len() % result.width(), 0);
        Ok(())
    }

    #[test_log::test]
    fn it_repeats_the_row_index_for_every_rowid_column() -> anyhow::Result<()> {
        let (_dir, store) = library()?;
        let result = materialize(&store, parse_query(&store, "SELECT name, rowid FROM Author")?)?;

        assert_eq!(result.column_names, vec!["rowid", "name", "rowid"]);
        assert_eq!(result.values, vec!["0", "Moses", "0", "1", "Paul", "1"]);
        Ok(())
    }

    #[test_log::test]
    fn it_fails_on_a_column_the_table_lacks() -> anyhow::Result<()> {
        let (_dir, store) = library()?;
        let error = materialize(&store, parse_query(&store, "SELECT title FROM Book")?)
            .map_err(|error| error.to_string());

        assert_eq!(
            error,
            Err("Field 'title' does not exist in table 'Book'".to_owned())
        );
        Ok(())
    }
}
