use anyhow::Result;
use chrono::{FixedOffset, TimeZone};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use vitrine_store::{
    Cell, FieldType, OpenOptions, RowRef, SnapshotBuilder, SnapshotOpener, Store, StoreError,
    StoreOpener,
};

fn library() -> SnapshotBuilder {
    SnapshotBuilder::default()
        .table("Author", |table| {
            table
                .field("name", FieldType::String)
                .primary_key("name")
                .row(json!({ "name": "Moses" }))
                .row(json!({ "name": "Paul" }))
        })
        .table("Book", |table| {
            table
                .field("title", FieldType::String)
                .field(
                    "author",
                    FieldType::Object {
                        target: "Author".into(),
                    },
                )
                .field("published", FieldType::Date)
                .field("cover", FieldType::Binary)
                .field("rating", FieldType::Float)
                .row(json!({
                    "title": "Genesis",
                    "author": 0,
                    "published": "2017-03-04T05:06:07.089+02:00",
                    "cover": [1, 2, 255],
                    "rating": 4.5
                }))
                .row(json!({ "title": "Hebrews", "author": null }))
        })
}

fn open(
    dir: &TempDir,
    name: &str,
    key: Option<&[u8]>,
) -> Result<vitrine_store::SnapshotStore, StoreError> {
    let mut options = OpenOptions::new(dir.path(), name);
    if let Some(key) = key {
        options = options.with_encryption_key(key);
    }
    SnapshotOpener.open(&options)
}

#[test_log::test]
fn it_iterates_rows_in_file_order_and_reads_typed_cells() -> Result<()> {
    let dir = tempfile::tempdir()?;
    library().write(dir.path().join("library.vdb"), None)?;
    let store = open(&dir, "library.vdb", None)?;

    assert_eq!(store.table_names(), vec!["Author", "Book"]);

    let rows: Vec<RowRef> = store.rows("Book")?.collect();
    assert_eq!(rows, vec![RowRef::new("Book", 0), RowRef::new("Book", 1)]);

    assert_eq!(store.read(&rows[0], "title")?, Cell::String("Genesis".into()));
    assert_eq!(
        store.read(&rows[0], "author")?,
        Cell::Object(RowRef::new("Author", 0))
    );
    assert_eq!(store.read(&rows[0], "cover")?, Cell::Binary(vec![1, 2, 255]));
    assert_eq!(store.read(&rows[0], "rating")?, Cell::Float(4.5));

    let offset = FixedOffset::east_opt(2 * 3600).ok_or_else(|| anyhow::anyhow!("offset"))?;
    let published = offset
        .with_ymd_and_hms(2017, 3, 4, 5, 6, 7)
        .single()
        .ok_or_else(|| anyhow::anyhow!("date"))?
        + chrono::Duration::milliseconds(89);
    assert_eq!(store.read(&rows[0], "published")?, Cell::Date(published));

    assert_eq!(store.read(&rows[1], "author")?, Cell::Null);
    assert_eq!(store.read(&rows[1], "published")?, Cell::Null);
    Ok(())
}

#[test_log::test]
fn it_reports_unknown_fields_and_mismatched_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    SnapshotBuilder::default()
        .table("Flag", |table| {
            table
                .field("enabled", FieldType::Boolean)
                .row(json!({ "enabled": "yes" }))
        })
        .write(dir.path().join("flags.vdb"), None)?;
    let store = open(&dir, "flags.vdb", None)?;
    let row = RowRef::new("Flag", 0);

    assert_eq!(
        store.read(&row, "enabled").map_err(|error| error.to_string()),
        Err("Field 'Flag.enabled' holds a string, expected boolean".to_owned())
    );
    assert!(matches!(
        store.read(&row, "missing"),
        Err(StoreError::NoSuchField { .. })
    ));
    assert!(matches!(
        store.rows("Nope").map(|rows| rows.count()),
        Err(StoreError::NoSuchTable(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_rejects_links_to_missing_tables() -> Result<()> {
    let dir = tempfile::tempdir()?;
    SnapshotBuilder::default()
        .table("Book", |table| {
            table.field(
                "author",
                FieldType::Object {
                    target: "Author".into(),
                },
            )
        })
        .write(dir.path().join("broken.vdb"), None)?;

    assert!(matches!(
        open(&dir, "broken.vdb", None),
        Err(StoreError::Decode(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_requires_the_right_key_for_sealed_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    library().write(dir.path().join("sealed.vdb"), Some(b"secret"))?;

    assert!(open(&dir, "sealed.vdb", Some(b"secret")).is_ok());
    assert!(matches!(
        open(&dir, "sealed.vdb", Some(b"guess")),
        Err(StoreError::Encryption(_))
    ));
    assert!(matches!(
        open(&dir, "sealed.vdb", None),
        Err(StoreError::Encryption(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_refuses_reads_after_close() -> Result<()> {
    let dir = tempfile::tempdir()?;
    library().write(dir.path().join("library.vdb"), None)?;
    let store = open(&dir, "library.vdb", None)?;

    store.close();
    store.close();

    assert!(store.is_closed());
    assert_eq!(
        store.read(&RowRef::new("Book", 0), "title"),
        Err(StoreError::Closed)
    );
    Ok(())
}
