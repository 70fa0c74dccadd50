use std::path::{Path, PathBuf};

use crate::{Cell, RowRef, StoreError, TableSchema};

/// Read access to an opened store.
///
/// Implementations must be shareable across request threads: a single
/// opened store is handed out to every caller that asks for the same file.
pub trait Store: Send + Sync {
    /// Names of every table the schema declares, in schema order
    fn table_names(&self) -> Vec<String>;

    /// The current schema of `table`, if it exists
    fn table_schema(&self, table: &str) -> Option<&TableSchema>;

    /// Every row of `table` in the store's native iteration order
    fn rows(&self, table: &str) -> Result<impl Iterator<Item = RowRef> + '_, StoreError>;

    /// Read the value of `field` from `row`, typed by the field's declared kind
    fn read(&self, row: &RowRef, field: &str) -> Result<Cell, StoreError>;

    /// Release the store. Subsequent reads fail with [`StoreError::Closed`].
    /// Closing twice is a no-op.
    fn close(&self);
}

/// Opens stores by location.
pub trait StoreOpener: Send + Sync {
    /// The kind of store this opener produces
    type Store: Store;

    /// Open the store described by `options`
    fn open(&self, options: &OpenOptions) -> Result<Self::Store, StoreError>;
}

/// Where a store lives and how to unlock it
#[derive(Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Directory containing the store file
    pub directory: PathBuf,
    /// File name of the store within `directory`
    pub name: String,
    /// Key to unseal an encrypted store with
    pub encryption_key: Option<Vec<u8>>,
}

impl OpenOptions {
    /// Describe the unencrypted store `name` inside `directory`
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            encryption_key: None,
        }
    }

    /// Use `key` to unseal the store
    pub fn with_encryption_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// The full path of the store file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Split a file path into containing directory and file name
    pub fn for_path(path: &Path) -> Result<Self, StoreError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StoreError::Open(format!("Not a file path: {}", path.display())))?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(Self::new(directory, name))
    }
}

impl std::fmt::Debug for OpenOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenOptions")
            .field("directory", &self.directory)
            .field("name", &self.name)
            .field("encrypted", &self.encryption_key.is_some())
            .finish()
    }
}
