//! Extract-transform-load of catalog and event-log files into the warehouse.

mod calendar;
mod error;
mod log_file;
mod song_file;
mod walker;

pub use error::EtlError;
pub use log_file::LogFileProcessor;
pub use song_file::SongFileProcessor;
pub use walker::{discover_json_files, process_data, Discovery, FileFailure, ProcessReport};

use rusqlite::Connection;
use std::ops::AddAssign;
use std::path::Path;

/// Rows written (or deliberately not written) while processing files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub songs: usize,
    pub artists: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays whose song and artist ids were resolved.
    pub matched_songplays: usize,
    /// Events dropped because they are not song plays.
    pub skipped_events: usize,
    /// Song play events dropped because of an unusable user id.
    pub rejected_events: usize,
    /// Catalog records after the first one in a file.
    pub ignored_records: usize,
}

impl AddAssign for RowCounts {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time_rows += other.time_rows;
        self.users += other.users;
        self.songplays += other.songplays;
        self.matched_songplays += other.matched_songplays;
        self.skipped_events += other.skipped_events;
        self.rejected_events += other.rejected_events;
        self.ignored_records += other.ignored_records;
    }
}

/// Loads a single input file into the warehouse.
///
/// The dispatcher hands every call its own transaction, so implementations
/// can simply bail out on the first error.
pub trait FileProcessor {
    /// Short label used in progress logs.
    fn name(&self) -> &'static str;

    fn process(&self, conn: &Connection, path: &Path) -> Result<RowCounts, EtlError>;
}
