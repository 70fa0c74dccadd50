use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand};

use crate::{ConfigError, InspectorConfig, NamePattern};

/// Command line of the `vitrine` binary
#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(bin_name = "vitrine")]
#[command(about = "Browse vitrine object stores the way DevTools does", long_about = None)]
pub struct VitrineCli {
    /// Application identifier reported with every database
    #[arg(long, global = true, default_value = "vitrine")]
    pub domain: String,

    /// Directory to scan for databases; defaults to the working directory
    #[arg(short, long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Regular expression database file names must match
    #[arg(short, long, global = true, conflicts_with = "glob")]
    pub pattern: Option<String>,

    /// Glob database file names must match
    #[arg(short, long, global = true)]
    pub glob: Option<String>,

    /// Encryption key for one file, as FILE=BASE64
    #[arg(short, long = "key", global = true, value_parser = parse_key)]
    pub keys: Vec<(String, Vec<u8>)>,

    /// Action to run
    #[command(subcommand)]
    pub command: VitrineCommand,
}

/// What to do once the inspector is configured
#[derive(Debug, Subcommand)]
pub enum VitrineCommand {
    /// Announce every database found, one JSON event per line
    List,

    /// Print the tables of a database
    Tables {
        /// Path of the database file
        database: String,
    },

    /// Run a query against a database
    Query {
        /// Path of the database file
        database: String,
        /// `SELECT` statement
        sql: String,
    },
}

impl VitrineCli {
    /// Inspector configuration described by the global options
    pub fn config(&self) -> Result<InspectorConfig, ConfigError> {
        let mut builder = InspectorConfig::builder(&self.domain).dirs(self.dirs.iter().cloned());
        if let Some(pattern) = &self.pattern {
            builder = builder.name_pattern(NamePattern::regex(pattern)?);
        }
        if let Some(glob) = &self.glob {
            builder = builder.name_pattern(NamePattern::glob(glob)?);
        }
        for (file, key) in &self.keys {
            builder = builder.encryption_key(file, key);
        }
        builder.build()
    }
}

fn parse_key(value: &str) -> Result<(String, Vec<u8>), String> {
    let (file, encoded) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FILE=BASE64, got '{value}'"))?;
    let key = STANDARD
        .decode(encoded)
        .map_err(|error| format!("key for '{file}' is not base64: {error}"))?;
    Ok((file.to_owned(), key))
}
