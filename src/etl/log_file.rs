//! Event-log files: newline-delimited page-view events.
//!
//! Only `NextSong` events are loaded. Each one contributes a time row, a
//! user upsert and a songplay whose song/artist ids are looked up in the
//! dimensions loaded from the catalog.

use super::calendar::decompose;
use super::{EtlError, FileProcessor, RowCounts};
use crate::warehouse::store::{find_song, insert_songplay, insert_time, upsert_user};
use crate::warehouse::{Level, SongplayRow, TimeRow, UserRow};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

const NEXT_SONG_PAGE: &str = "NextSong";

/// userId shows up as a string, a number, or garbage depending on the producer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Integer(i64),
    Text(String),
    Other(Value),
}

impl RawUserId {
    /// Decimal text of a non-negative integer id, or `None` if unusable.
    ///
    /// Text ids lose their leading zeros so `"0042"` and `42` name the same user.
    fn normalize(&self) -> Option<String> {
        match self {
            RawUserId::Integer(id) if *id >= 0 => Some(id.to_string()),
            RawUserId::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                match trimmed.trim_start_matches('0') {
                    "" => Some("0".to_string()),
                    digits => Some(digits.to_string()),
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    ts: Option<i64>,
    user_id: Option<RawUserId>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// What the event says was played, used for the dimension lookup.
#[derive(Debug, PartialEq)]
struct PlayedSong {
    title: String,
    artist_name: String,
    duration: f64,
}

/// A validated `NextSong` event.
#[derive(Debug)]
struct PlayEvent {
    time: TimeRow,
    user: UserRow,
    played: Option<PlayedSong>,
    session_id: i64,
    location: Option<String>,
    user_agent: Option<String>,
}

impl PlayEvent {
    /// Returns `Ok(None)` when the event must be rejected because of its user id.
    fn from_raw(event: RawEvent, path: &Path, line: usize) -> Result<Option<Self>, EtlError> {
        let user_id = match event.user_id.as_ref().and_then(RawUserId::normalize) {
            Some(user_id) => user_id,
            None => {
                warn!(
                    "Rejecting song play in {:?} at line {}: unusable userId {:?}",
                    path, line, event.user_id
                );
                return Ok(None);
            }
        };

        let missing = |field: &'static str| EtlError::MissingField {
            path: path.to_path_buf(),
            line,
            field,
        };

        let ts = event.ts.ok_or_else(|| missing("ts"))?;
        let time = decompose(ts).ok_or_else(|| EtlError::InvalidTimestamp {
            path: path.to_path_buf(),
            line,
            ts,
        })?;
        let level_str = event.level.ok_or_else(|| missing("level"))?;
        let level = Level::from_db_str(&level_str).ok_or_else(|| EtlError::InvalidField {
            path: path.to_path_buf(),
            line,
            field: "level",
            value: level_str.clone(),
        })?;
        let session_id = event.session_id.ok_or_else(|| missing("sessionId"))?;

        let played = match (event.song, event.artist, event.length) {
            (Some(title), Some(artist_name), Some(duration)) => Some(PlayedSong {
                title,
                artist_name,
                duration,
            }),
            _ => None,
        };

        Ok(Some(PlayEvent {
            time,
            user: UserRow {
                user_id,
                first_name: event.first_name,
                last_name: event.last_name,
                gender: event.gender,
                level,
            },
            played,
            session_id,
            location: event.location,
            user_agent: event.user_agent,
        }))
    }
}

pub struct LogFileProcessor;

impl LogFileProcessor {
    fn parse(path: &Path, counts: &mut RowCounts) -> Result<Vec<PlayEvent>, EtlError> {
        let content = std::fs::read_to_string(path).map_err(|e| EtlError::io(path, e))?;

        let mut plays = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let json_error = |source| EtlError::Json {
                path: path.to_path_buf(),
                line: line_number,
                source,
            };
            // Only song plays are typed; other pages may carry any field shapes.
            let value: Value = serde_json::from_str(line).map_err(json_error)?;
            if value.get("page").and_then(Value::as_str) != Some(NEXT_SONG_PAGE) {
                counts.skipped_events += 1;
                continue;
            }
            let event: RawEvent = serde_json::from_value(value).map_err(json_error)?;
            match PlayEvent::from_raw(event, path, line_number)? {
                Some(play) => plays.push(play),
                None => counts.rejected_events += 1,
            }
        }
        Ok(plays)
    }
}

impl FileProcessor for LogFileProcessor {
    fn name(&self) -> &'static str {
        "log"
    }

    fn process(&self, conn: &Connection, path: &Path) -> Result<RowCounts, EtlError> {
        let mut counts = RowCounts::default();
        let plays = Self::parse(path, &mut counts)?;

        for play in &plays {
            if insert_time(conn, &play.time)? {
                counts.time_rows += 1;
            }
        }

        for play in &plays {
            upsert_user(conn, &play.user)?;
            counts.users += 1;
        }

        for play in &plays {
            let song_match = match &play.played {
                Some(played) => {
                    find_song(conn, &played.title, &played.artist_name, played.duration)?
                }
                None => None,
            };
            if song_match.is_some() {
                counts.matched_songplays += 1;
            }
            let (song_id, artist_id) = match song_match {
                Some(found) => (Some(found.song_id), Some(found.artist_id)),
                None => (None, None),
            };

            insert_songplay(
                conn,
                &SongplayRow {
                    start_time: play.time.start_time,
                    user_id: play.user.user_id.clone(),
                    level: play.user.level,
                    song_id,
                    artist_id,
                    session_id: play.session_id,
                    location: play.location.clone(),
                    user_agent: play.user_agent.clone(),
                },
            )?;
            counts.songplays += 1;
        }

        debug!(
            "{:?}: {} song plays, {} matched, {} skipped events",
            path, counts.songplays, counts.matched_songplays, counts.skipped_events
        );
        Ok(counts)
    }
}
