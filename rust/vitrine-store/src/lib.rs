#![warn(missing_docs)]

//! The embedded object store that vitrine inspects.
//!
//! The inspector never depends on a concrete engine. It talks to a
//! [`StoreOpener`] to obtain a [`Store`], and to the store only through
//! table names, [`TableSchema`]s, [`RowRef`] iteration and typed [`Cell`]
//! reads. Rows have no static shape: every read is a dynamic lookup by
//! field name, and the value kind comes back as a closed [`Cell`] variant.
//!
//! [`SnapshotStore`] is the engine shipped with this crate. It reads
//! JSON snapshot files, optionally sealed with a key, and
//! [`SnapshotBuilder`] writes them.

mod cell;
pub use cell::*;

mod error;
pub use error::*;

mod schema;
pub use schema::*;

mod snapshot;
pub use snapshot::*;

mod store;
pub use store::*;
