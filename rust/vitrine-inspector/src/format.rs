//! Rendering of stored values as DevTools cell text.
//!
//! The placeholder strings are a stable contract: DevTools shows them as
//! opaque text, and tooling compares them verbatim.

use vitrine_store::{Cell, RowRef, Store, StoreError};

/// Text for a missing value
pub const NULL_CELL: &str = "<null>";
/// Text for a backlink field
pub const LINKING_OBJECTS_CELL: &str = "<linking objects>";
/// Text for the engine's legacy date kind
pub const UNSUPPORTED_DATE_CELL: &str = "<unsupported date>";
/// Text for a polymorphic value
pub const UNSUPPORTED_MIXED_CELL: &str = "<unsupported mixed>";
/// Text for a nested sub-table
pub const UNSUPPORTED_TABLE_CELL: &str = "<unsupported table>";
/// Text for any other kind
pub const UNSUPPORTED_CELL: &str = "<unsupported>";

/// `chrono` format for dates: milliseconds and a `+hhmm` offset
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Read `column` of `row` and render it
pub fn format_cell<S>(store: &S, row: &RowRef, column: &str) -> Result<String, StoreError>
where
    S: Store,
{
    format_value(store, store.read(row, column)?)
}

/// Render a value read from `store`.
///
/// A link renders as the linked row's table name, followed by
/// ` <key: value>` when that table has a primary key. The key value is
/// rendered with this same function, except that links found there show
/// only their table name, so expansion never goes more than one row deep.
pub fn format_value<S>(store: &S, cell: Cell) -> Result<String, StoreError>
where
    S: Store,
{
    render(store, cell, true)
}

fn render<S>(store: &S, cell: Cell, expand_links: bool) -> Result<String, StoreError>
where
    S: Store,
{
    Ok(match cell {
        Cell::Null => NULL_CELL.to_owned(),
        Cell::Binary(bytes) => format!("{bytes:?}"),
        Cell::Boolean(value) => value.to_string(),
        Cell::Date(date) => date.format(DATE_FORMAT).to_string(),
        Cell::Double(value) => format!("{value:?}"),
        Cell::Float(value) => format!("{value:?}"),
        Cell::Integer(value) => value.to_string(),
        Cell::String(value) => value,
        Cell::Object(row) => render_link(store, &row, expand_links)?,
        Cell::List(rows) => rows
            .iter()
            .map(|row| render_link(store, row, expand_links))
            .collect::<Result<Vec<_>, _>>()?
            .join(", "),
        Cell::LinkingObjects => LINKING_OBJECTS_CELL.to_owned(),
        Cell::UnsupportedDate => UNSUPPORTED_DATE_CELL.to_owned(),
        Cell::UnsupportedMixed => UNSUPPORTED_MIXED_CELL.to_owned(),
        Cell::UnsupportedTable => UNSUPPORTED_TABLE_CELL.to_owned(),
        Cell::Unsupported => UNSUPPORTED_CELL.to_owned(),
    })
}

fn render_link<S>(store: &S, row: &RowRef, expand: bool) -> Result<String, StoreError>
where
    S: Store,
{
    let mut text = row.table().to_owned();
    if !expand {
        return Ok(text);
    }

    let schema = store
        .table_schema(row.table())
        .ok_or_else(|| StoreError::NoSuchTable(row.table().to_owned()))?;
    if let Some(key) = &schema.primary_key {
        let value = render(store, store.read(row, key)?, false)?;
        text.push_str(&format!(" <{key}: {value}>"));
    }
    Ok(text)
}
