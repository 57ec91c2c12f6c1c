//! Test fixture creation for the warehouse and the input trees

#![allow(dead_code)]

use rusqlite::Connection;
use sparkify_etl::etl::{process_data, LogFileProcessor, ProcessReport, SongFileProcessor};
use sparkify_etl::warehouse::{initialize_database, open_warehouse, reset_schema};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DB_FILE_NAME: &str = "sparkifydb.db";

/// A freshly created warehouse plus empty song and log data directories,
/// all living in one temporary directory.
pub struct TestWarehouse {
    pub dir: TempDir,
    pub conn: Connection,
}

impl TestWarehouse {
    pub fn create() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();

        let conn = initialize_database(dir.path(), DB_FILE_NAME).unwrap();
        reset_schema(&conn).unwrap();
        drop(conn);

        // Load through the same path the binary uses
        let conn = open_warehouse(&dir.path().join(DB_FILE_NAME)).unwrap();
        TestWarehouse { dir, conn }
    }

    pub fn song_data(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn write_song_file(&self, relative_path: &str, content: &str) -> PathBuf {
        write_file(&self.song_data(), relative_path, content)
    }

    pub fn write_log_file(&self, relative_path: &str, lines: &[&str]) -> PathBuf {
        write_file(&self.log_data(), relative_path, &lines.join("\n"))
    }

    pub fn load_songs(&mut self) -> ProcessReport {
        let root = self.song_data();
        process_data(&mut self.conn, &root, &SongFileProcessor).unwrap()
    }

    pub fn load_logs(&mut self) -> ProcessReport {
        let root = self.log_data();
        process_data(&mut self.conn, &root, &LogFileProcessor).unwrap()
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }
}

fn write_file(root: &Path, relative_path: &str, content: &str) -> PathBuf {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
