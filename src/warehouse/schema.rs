//! SQLite schema definitions for the songplay warehouse.
//!
//! One fact table (`songplays`) and four dimension tables. Keys referencing
//! other tables are plain columns: nothing is enforced, the songplay ids are
//! resolved best-effort by [`SONG_SELECT`].

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

// =============================================================================
// Fact Table
// =============================================================================

const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Integer, non_null = true), // epoch millis
        sqlite_column!("user_id", &SqlType::Text, non_null = true),
        sqlite_column!("level", &SqlType::Text, non_null = true), // 'free', 'paid'
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
};

// =============================================================================
// Dimension Tables
// =============================================================================

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("duration", &SqlType::Real, non_null = true),
    ],
    indices: &[
        ("idx_songs_title", "title"),
        ("idx_songs_artist", "artist_id"),
    ],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
};

pub const WAREHOUSE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGPLAYS_TABLE,
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
    ],
}];

pub fn current_schema() -> &'static VersionedSchema {
    &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1]
}

// =============================================================================
// Statements
// =============================================================================

pub const SONGPLAY_TABLE_INSERT: &str = "INSERT INTO songplays \
    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Later appearances of a user overwrite the subscription level.
pub const USER_TABLE_INSERT: &str = "INSERT INTO users \
    (user_id, first_name, last_name, gender, level) \
    VALUES (?1, ?2, ?3, ?4, ?5) \
    ON CONFLICT(user_id) DO UPDATE SET level = excluded.level";

pub const SONG_TABLE_INSERT: &str = "INSERT INTO songs \
    (song_id, title, artist_id, year, duration) \
    VALUES (?1, ?2, ?3, ?4, ?5) \
    ON CONFLICT(song_id) DO NOTHING";

pub const ARTIST_TABLE_INSERT: &str = "INSERT INTO artists \
    (artist_id, name, location, latitude, longitude) \
    VALUES (?1, ?2, ?3, ?4, ?5) \
    ON CONFLICT(artist_id) DO NOTHING";

pub const TIME_TABLE_INSERT: &str = "INSERT INTO time \
    (start_time, hour, day, week, month, year, weekday) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
    ON CONFLICT(start_time) DO NOTHING";

/// (title, artist name, duration) -> (song_id, artist_id) of the first match.
pub const SONG_SELECT: &str = "SELECT songs.song_id, artists.artist_id \
    FROM songs JOIN artists ON songs.artist_id = artists.artist_id \
    WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3 \
    LIMIT 1";

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_creates_and_validates() {
        let conn = Connection::open_in_memory().unwrap();
        current_schema().create(&conn).unwrap();
        current_schema().validate(&conn).unwrap();
    }

    #[test]
    fn test_statements_prepare_against_schema() {
        let conn = Connection::open_in_memory().unwrap();
        current_schema().create(&conn).unwrap();

        for sql in [
            SONGPLAY_TABLE_INSERT,
            USER_TABLE_INSERT,
            SONG_TABLE_INSERT,
            ARTIST_TABLE_INSERT,
            TIME_TABLE_INSERT,
            SONG_SELECT,
        ] {
            conn.prepare(sql).unwrap();
        }
    }
}
