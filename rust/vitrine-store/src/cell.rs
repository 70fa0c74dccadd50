use chrono::{DateTime, FixedOffset};

/// An opaque handle to one row of one table.
///
/// Rows have no static type; everything about them is reached through
/// [`Store::read`](crate::Store::read) by field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowRef {
    table: String,
    index: usize,
}

impl RowRef {
    /// Refer to the row at `index` in `table`
    pub fn new(table: impl Into<String>, index: usize) -> Self {
        Self {
            table: table.into(),
            index,
        }
    }

    /// The name of the table (the row's type)
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Position of the row in its table's native iteration order
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A typed value read from one field of one row.
///
/// The set of variants is closed: consumers are expected to match on it
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value is stored (includes a single link that points nowhere)
    Null,
    /// A byte buffer
    Binary(Vec<u8>),
    /// A boolean
    Boolean(bool),
    /// A timestamp carrying the offset it was stored with
    Date(DateTime<FixedOffset>),
    /// A 64-bit float
    Double(f64),
    /// A 32-bit float
    Float(f32),
    /// A 64-bit signed integer
    Integer(i64),
    /// A UTF-8 string
    String(String),
    /// A link to a single row
    Object(RowRef),
    /// An ordered list of links
    List(Vec<RowRef>),
    /// A backlink field; its contents are computed and not read
    LinkingObjects,
    /// A legacy date value
    UnsupportedDate,
    /// A polymorphic value
    UnsupportedMixed,
    /// A nested sub-table
    UnsupportedTable,
    /// Any other kind this reader cannot interpret
    Unsupported,
}
