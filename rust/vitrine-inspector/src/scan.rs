//! Discovery of database files on disk.
//!
//! Every configured directory is listed (non-recursively) and each regular,
//! readable file whose name matches the configured pattern becomes a
//! [`DatabaseDescriptor`]. Anything that cannot be listed or read is skipped
//! without error: seeing only some databases is expected when parts of an
//! application's storage are off limits.

use std::{
    fs::{DirEntry, File},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::InspectorConfig;

/// Reported in place of a schema version, which object stores do not expose
pub const DATABASE_VERSION: &str = "N/A";

/// One discoverable database file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    /// Absolute path of the file; clients send it back as `databaseId`
    pub id: String,
    /// Identifier of the owning application
    pub domain: String,
    /// File name
    pub name: String,
    /// Always [`DATABASE_VERSION`]
    pub version: String,
}

/// List every matching database file in the configured directories, in
/// directory listing order
pub fn scan(config: &InspectorConfig) -> Vec<DatabaseDescriptor> {
    config
        .dirs()
        .iter()
        .flat_map(|dir| scan_dir(dir, config))
        .collect()
}

fn scan_dir(dir: &Path, config: &InspectorConfig) -> Vec<DatabaseDescriptor> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(dir = %dir.display(), %error, "Skipping unreadable directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| describe(&entry, config))
        .collect()
}

fn describe(entry: &DirEntry, config: &InspectorConfig) -> Option<DatabaseDescriptor> {
    let name = entry.file_name().into_string().ok()?;
    if !config.name_pattern().matches(&name) {
        return None;
    }

    let path = entry.path();
    match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_file() => (),
        _ => {
            tracing::debug!(path = %path.display(), "Skipping entry that is not a regular file");
            return None;
        }
    }
    if let Err(error) = File::open(&path) {
        tracing::debug!(path = %path.display(), %error, "Skipping unreadable file");
        return None;
    }

    let id = std::path::absolute(&path).ok()?;
    Some(DatabaseDescriptor {
        id: id.to_string_lossy().into_owned(),
        domain: config.domain().to_owned(),
        name,
        version: DATABASE_VERSION.to_owned(),
    })
}
