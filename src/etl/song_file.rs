//! Catalog files: one song and its artist per file.

use super::{EtlError, FileProcessor, RowCounts};
use crate::warehouse::store::{insert_artist, insert_song};
use crate::warehouse::{ArtistRow, SongRow};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// A catalog record as found on disk. Unknown fields (e.g. `num_songs`) are ignored.
#[derive(Debug, Deserialize)]
struct SongRecord {
    song_id: String,
    title: String,
    artist_id: String,
    year: Option<i32>,
    duration: f64,
    artist_name: String,
    artist_location: Option<String>,
    artist_latitude: Option<f64>,
    artist_longitude: Option<f64>,
}

impl SongRecord {
    fn song_row(&self) -> SongRow {
        SongRow {
            song_id: self.song_id.clone(),
            title: self.title.clone(),
            artist_id: self.artist_id.clone(),
            year: self.year.unwrap_or(0),
            duration: self.duration,
        }
    }

    fn artist_row(&self) -> ArtistRow {
        ArtistRow {
            artist_id: self.artist_id.clone(),
            name: self.artist_name.clone(),
            location: self.artist_location.clone(),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        }
    }
}

/// Read the first record of a catalog file, plus how many records followed it.
fn read_first_record(path: &Path) -> Result<(SongRecord, usize), EtlError> {
    let content = std::fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;

    let mut records = serde_json::Deserializer::from_str(&content).into_iter::<SongRecord>();
    let first = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(source)) => {
            return Err(EtlError::Json {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })
        }
        None => return Err(EtlError::EmptyCatalogFile(path.to_path_buf())),
    };

    // Anything after the first record only needs to be counted, not understood.
    let ignored = serde_json::Deserializer::from_str(&content)
        .into_iter::<serde_json::Value>()
        .skip(1)
        .take_while(|value| value.is_ok())
        .count();

    Ok((first, ignored))
}

pub struct SongFileProcessor;

impl FileProcessor for SongFileProcessor {
    fn name(&self) -> &'static str {
        "song"
    }

    fn process(&self, conn: &Connection, path: &Path) -> Result<RowCounts, EtlError> {
        let (record, ignored) = read_first_record(path)?;
        if ignored > 0 {
            warn!(
                "{:?} holds {} extra catalog records, only the first one is loaded",
                path, ignored
            );
        }

        let mut counts = RowCounts {
            ignored_records: ignored,
            ..Default::default()
        };
        if insert_song(conn, &record.song_row())? {
            counts.songs += 1;
        }
        if insert_artist(conn, &record.artist_row())? {
            counts.artists += 1;
        }
        debug!("Loaded song {} by {}", record.song_id, record.artist_id);
        Ok(counts)
    }
}
