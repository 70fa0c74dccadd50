use std::{
    io::{Write, stdout},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, fmt};
use vitrine_inspector::{
    DatabaseDomain, ExecuteSqlRequest, GetDatabaseTableNamesRequest, Peer, PeerId, VitrineCli,
    VitrineCommand,
};
use vitrine_store::SnapshotOpener;

/// Prints every event it receives as a JSON line
struct StdoutPeer;

impl Peer for StdoutPeer {
    fn id(&self) -> PeerId {
        0
    }

    fn notify(&self, method: &str, params: Value) {
        let line = json!({ "method": method, "params": params });
        let mut out = stdout().lock();
        if let Err(error) = writeln!(out, "{line}") {
            tracing::warn!(%error, "Failed to write event");
        }
    }
}

pub fn main() -> Result<ExitCode> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = VitrineCli::parse();
    let domain = DatabaseDomain::new(cli.config()?, SnapshotOpener);

    match cli.command {
        VitrineCommand::List => {
            let peer: Arc<dyn Peer> = Arc::new(StdoutPeer);
            domain.enable(peer.clone());
            domain.disable(peer.id());
        }
        VitrineCommand::Tables { database } => {
            let response = domain.get_database_table_names(GetDatabaseTableNamesRequest {
                database_id: database,
            })?;
            for name in response.table_names {
                println!("{name}");
            }
        }
        VitrineCommand::Query { database, sql } => {
            let response = domain.execute_sql(ExecuteSqlRequest {
                database_id: database,
                query: sql,
            });
            if let Some(error) = response.sql_error {
                eprintln!("{}", error.message);
                return Ok(ExitCode::FAILURE);
            }

            let columns = response.column_names.unwrap_or_default();
            let values = response.values.unwrap_or_default();
            println!("{}", columns.join("\t"));
            for row in values.chunks(columns.len().max(1)) {
                println!("{}", row.join("\t"));
            }
        }
    }

    domain.cache().close_all();
    Ok(ExitCode::SUCCESS)
}
