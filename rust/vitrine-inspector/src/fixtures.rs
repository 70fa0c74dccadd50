//! Database files shared by unit tests.

use std::path::Path;

use serde_json::json;
use vitrine_store::{FieldType, SnapshotBuilder};

pub const LIBRARY_FILE: &str = "library.vdb";
pub const SEALED_FILE: &str = "sealed.vdb";
pub const KEY: &[u8] = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn link(target: &str) -> FieldType {
    FieldType::Object {
        target: target.into(),
    }
}

pub fn library_snapshot() -> SnapshotBuilder {
    SnapshotBuilder::default()
        .table("Author", |table| {
            table
                .field("id", FieldType::Integer)
                .field("name", FieldType::String)
                .primary_key("id")
                .row(json!({ "id": 42, "name": "Moses" }))
                .row(json!({ "id": 7, "name": "Paul" }))
        })
        .table("Publisher", |table| {
            table
                .field("name", FieldType::String)
                .row(json!({ "name": "Scroll House" }))
        })
        .table("Character", |table| {
            table
                .field("name", FieldType::String)
                .primary_key("name")
                .row(json!({ "name": "Adam" }))
                .row(json!({ "name": "Eve" }))
        })
        .table("Book", |table| {
            table
                .field("name", FieldType::String)
                .field("index", FieldType::Integer)
                .field("author", link("Author"))
                .field("publisher", link("Publisher"))
                .field(
                    "characters",
                    FieldType::List {
                        target: "Character".into(),
                    },
                )
                .field(
                    "readers",
                    FieldType::LinkingObjects {
                        source: "Reader".into(),
                        field: "favorite".into(),
                    },
                )
                .field("cover", FieldType::Binary)
                .field("published", FieldType::Date)
                .field("rating", FieldType::Float)
                .field("score", FieldType::Double)
                .field("available", FieldType::Boolean)
                .field("legacy", FieldType::UnsupportedDate)
                .field("extra", FieldType::UnsupportedMixed)
                .field("chapters", FieldType::UnsupportedTable)
                .field("isbn", FieldType::Unknown)
                .row(json!({
                    "name": "Genesis",
                    "index": 0,
                    "author": 0,
                    "publisher": 0,
                    "characters": [0, 1],
                    "cover": [1, 2, 255],
                    "published": "2017-01-02T03:04:05.678Z",
                    "rating": 4.5,
                    "score": 9.75,
                    "available": true,
                    "legacy": 1,
                    "extra": "anything",
                    "chapters": [],
                    "isbn": "978-0"
                }))
                .row(json!({
                    "name": "Exodus",
                    "index": 1,
                    "characters": [],
                    "available": false
                }))
                .row(json!({
                    "name": null,
                    "index": 57,
                    "author": 1,
                    "published": "2017-01-02T08:30:00.000+05:30"
                }))
        })
        .table("Reader", |table| {
            table
                .field("name", FieldType::String)
                .field("favorite", link("Book"))
                .row(json!({ "name": "Ruth", "favorite": 0 }))
        })
        .table("Node", |table| {
            table
                .field("parent", link("Node"))
                .primary_key("parent")
                .row(json!({ "parent": 1 }))
                .row(json!({ "parent": 0 }))
        })
}

pub fn library(dir: &Path) -> anyhow::Result<String> {
    let path = dir.join(LIBRARY_FILE);
    library_snapshot().write(&path, None)?;
    Ok(path.to_string_lossy().into_owned())
}

pub fn sealed(dir: &Path) -> anyhow::Result<String> {
    let path = dir.join(SEALED_FILE);
    library_snapshot().write(&path, Some(KEY))?;
    Ok(path.to_string_lossy().into_owned())
}
