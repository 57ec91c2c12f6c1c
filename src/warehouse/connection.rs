//! Opening, recreating and resetting the warehouse database.

use super::schema::current_schema;
use crate::sqlite_persistence::VersionedSchema;
use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files SQLite may leave next to the database.
const SIDECAR_SUFFIXES: &[&str] = &["-wal", "-shm", "-journal"];

fn sidecar_path(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
    }
}

/// Drop and recreate the warehouse database, returning a connection to the
/// fresh, empty file.
///
/// The database directory plays the part of the administrative database: it
/// must already exist. Any existing warehouse file in it is deleted.
pub fn initialize_database(db_dir: &Path, db_file_name: &str) -> Result<Connection> {
    if !db_dir.is_dir() {
        bail!(
            "Database directory {:?} does not exist or is not a directory",
            db_dir
        );
    }

    let db_path = db_dir.join(db_file_name);
    if db_path.exists() {
        warn!("Dropping existing warehouse at {:?}", db_path);
    }
    remove_if_exists(&db_path)?;
    for suffix in SIDECAR_SUFFIXES {
        remove_if_exists(&sidecar_path(&db_path, suffix))?;
    }

    info!("Creating warehouse at {:?}", db_path);
    Connection::open_with_flags(
        &db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to create warehouse database {:?}", db_path))
}

/// Drop every warehouse table, then create them all again.
///
/// Runs in autocommit mode, so each statement is committed on its own.
pub fn reset_schema(conn: &Connection) -> Result<()> {
    let schema = current_schema();
    if !conn.is_autocommit() {
        bail!("Cannot reset the warehouse schema inside a transaction");
    }

    schema
        .drop(conn)
        .context("Failed to drop the warehouse tables")?;
    // Creates every table and index, then stamps the version.
    schema
        .create(conn)
        .context("Failed to create the warehouse tables")?;

    info!(
        "Warehouse schema version {} ready with {} tables",
        schema.version,
        schema.tables.len()
    );
    Ok(())
}

/// Open an existing warehouse for loading. Never creates or drops anything.
pub fn open_warehouse(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        bail!(
            "Warehouse {:?} does not exist, run create-tables first",
            db_path
        );
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open warehouse {:?}", db_path))?;

    let schema = current_schema();
    match VersionedSchema::read_version(&conn)? {
        Some(version) if version == schema.version => {}
        Some(version) => bail!(
            "Warehouse {:?} has schema version {}, expected {}",
            db_path,
            version,
            schema.version
        ),
        None => bail!(
            "Warehouse {:?} has no schema, run create-tables first",
            db_path
        ),
    }
    schema
        .validate(&conn)
        .with_context(|| format!("Warehouse {:?} failed schema validation", db_path))?;

    info!("Opened warehouse at {:?}", db_path);
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::models::SongRow;
    use crate::warehouse::store::{get_counts, insert_song};
    use tempfile::TempDir;

    const DB_NAME: &str = "test.db";

    fn test_song() -> SongRow {
        SongRow {
            song_id: "S1".to_string(),
            title: "T".to_string(),
            artist_id: "A1".to_string(),
            year: 2000,
            duration: 210.5,
        }
    }

    #[test]
    fn test_initialize_requires_existing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        assert!(initialize_database(&missing, DB_NAME).is_err());
    }

    #[test]
    fn test_initialize_discards_existing_data() {
        let temp_dir = TempDir::new().unwrap();

        let conn = initialize_database(temp_dir.path(), DB_NAME).unwrap();
        reset_schema(&conn).unwrap();
        insert_song(&conn, &test_song()).unwrap();
        drop(conn);

        let conn = initialize_database(temp_dir.path(), DB_NAME).unwrap();
        reset_schema(&conn).unwrap();
        assert_eq!(get_counts(&conn).unwrap().songs, 0);
    }

    #[test]
    fn test_reset_schema_drops_rows() {
        let conn = Connection::open_in_memory().unwrap();
        reset_schema(&conn).unwrap();
        insert_song(&conn, &test_song()).unwrap();

        reset_schema(&conn).unwrap();
        assert_eq!(get_counts(&conn).unwrap().songs, 0);
        current_schema().validate(&conn).unwrap();
        assert_eq!(
            VersionedSchema::read_version(&conn).unwrap(),
            Some(current_schema().version)
        );
    }

    #[test]
    fn test_open_warehouse_after_setup() {
        let temp_dir = TempDir::new().unwrap();
        let conn = initialize_database(temp_dir.path(), DB_NAME).unwrap();
        reset_schema(&conn).unwrap();
        insert_song(&conn, &test_song()).unwrap();
        drop(conn);

        let conn = open_warehouse(&temp_dir.path().join(DB_NAME)).unwrap();
        assert_eq!(get_counts(&conn).unwrap().songs, 1);
    }

    #[test]
    fn test_open_warehouse_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = open_warehouse(&temp_dir.path().join(DB_NAME)).unwrap_err();
        assert!(err.to_string().contains("create-tables"));
    }

    #[test]
    fn test_open_warehouse_without_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join(DB_NAME);
        Connection::open(&db_path)
            .unwrap()
            .execute("CREATE TABLE unrelated (id INTEGER)", [])
            .unwrap();

        let err = open_warehouse(&db_path).unwrap_err();
        assert!(err.to_string().contains("no schema"));
    }
}
