use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store file could not be read or created
    #[error("Failed to open store: {0}")]
    Open(String),

    /// The store file could not be sealed or unsealed with the given key
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The store file was readable but its contents were not understood
    #[error("Malformed store file: {0}")]
    Decode(String),

    /// A table was referenced that the schema does not declare
    #[error("Table '{0}' does not exist")]
    NoSuchTable(String),

    /// A field was referenced that the table does not declare
    #[error("Field '{field}' does not exist in table '{table}'")]
    NoSuchField {
        /// Table that was searched
        table: String,
        /// Field that was requested
        field: String,
    },

    /// A row handle pointed past the end of its table
    #[error("Row {index} does not exist in table '{table}'")]
    NoSuchRow {
        /// Table that was searched
        table: String,
        /// Requested row position
        index: usize,
    },

    /// A stored value did not have the shape its declared type requires
    #[error("Field '{table}.{field}' holds {found}, expected {expected}")]
    TypeMismatch {
        /// Table holding the value
        table: String,
        /// Field holding the value
        field: String,
        /// The declared kind
        expected: &'static str,
        /// What was actually stored
        found: String,
    },

    /// The store was used after [`crate::Store::close`]
    #[error("Store has been closed")]
    Closed,
}
