//! Chrome DevTools `Database` domain for vitrine object stores.
//!
//! `vitrine-inspector` lets the DevTools Resources panel browse the object
//! stores an application keeps on disk, as if they were SQL databases.
//!
//! # Flow
//!
//! ```text
//! enable ──▸ scan ──▸ Database.addDatabase (one per file)
//!
//! executeSQL ──▸ ConnectionCache::resolve ──▸ parse_query
//!            ──▸ materialize ──▸ format_cell (per cell) ──▸ response
//!
//! disable ──▸ ConnectionCache::close_all
//! ```
//!
//! Only two query shapes are understood, the ones the Resources panel sends
//! when a table is opened:
//!
//! ```text
//! SELECT rowid, * FROM "Book"
//! SELECT name, author FROM Book
//! ```
//!
//! Every result starts with a `rowid` column holding each row's position in
//! the table. Linked rows render as their table name, followed by their
//! primary key when the table has one: `Author <id: 42>`.
//!
//! Transports plug in through [`Peer`] (event delivery to one client) and
//! [`DevtoolsDomain`] (routing of method calls), so the domain itself never
//! deals with sockets or JSON-RPC envelopes.

#![warn(missing_docs)]

mod cache;
mod cli;
mod config;
mod domain;
mod error;
mod format;
mod materialize;
mod peer;
mod protocol;
mod query;
mod scan;
mod session;

#[cfg(test)]
mod fixtures;

pub use cache::*;
pub use cli::*;
pub use config::*;
pub use domain::*;
pub use error::*;
pub use format::*;
pub use materialize::*;
pub use peer::*;
pub use protocol::*;
pub use query::*;
pub use scan::*;
pub use session::*;
