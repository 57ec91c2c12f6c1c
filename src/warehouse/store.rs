//! Typed writes and lookups against the warehouse tables.
//!
//! Every function takes a plain `&Connection` so callers can pass either a
//! connection or a `Transaction` (which derefs to one). Statements are
//! cached on the connection, so per-row calls don't re-parse SQL.

use super::models::*;
use super::schema::*;
use rusqlite::{params, Connection, OptionalExtension};

/// Inserts a song; returns false if a song with the same id already exists.
pub fn insert_song(conn: &Connection, song: &SongRow) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare_cached(SONG_TABLE_INSERT)?;
    let inserted = stmt.execute(params![
        song.song_id,
        song.title,
        song.artist_id,
        song.year,
        song.duration,
    ])?;
    Ok(inserted > 0)
}

/// Inserts an artist; returns false if an artist with the same id already exists.
pub fn insert_artist(conn: &Connection, artist: &ArtistRow) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare_cached(ARTIST_TABLE_INSERT)?;
    let inserted = stmt.execute(params![
        artist.artist_id,
        artist.name,
        artist.location,
        artist.latitude,
        artist.longitude,
    ])?;
    Ok(inserted > 0)
}

/// Inserts a time row; returns false if the timestamp was already present.
pub fn insert_time(conn: &Connection, time: &TimeRow) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare_cached(TIME_TABLE_INSERT)?;
    let inserted = stmt.execute(params![
        time.start_time,
        time.hour,
        time.day,
        time.week,
        time.month,
        time.year,
        time.weekday,
    ])?;
    Ok(inserted > 0)
}

pub fn upsert_user(conn: &Connection, user: &UserRow) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(USER_TABLE_INSERT)?;
    stmt.execute(params![
        user.user_id,
        user.first_name,
        user.last_name,
        user.gender,
        user.level,
    ])?;
    Ok(())
}

/// Returns the generated songplay id.
pub fn insert_songplay(conn: &Connection, songplay: &SongplayRow) -> rusqlite::Result<i64> {
    let mut stmt = conn.prepare_cached(SONGPLAY_TABLE_INSERT)?;
    stmt.execute(params![
        songplay.start_time,
        songplay.user_id,
        songplay.level,
        songplay.song_id,
        songplay.artist_id,
        songplay.session_id,
        songplay.location,
        songplay.user_agent,
    ])?;
    Ok(conn.last_insert_rowid())
}

/// Find the song and artist ids matching a played song exactly.
pub fn find_song(
    conn: &Connection,
    title: &str,
    artist_name: &str,
    duration: f64,
) -> rusqlite::Result<Option<SongMatch>> {
    let mut stmt = conn.prepare_cached(SONG_SELECT)?;
    let found = stmt
        .query_row(params![title, artist_name, duration], |row| {
            Ok(SongMatch {
                song_id: row.get(0)?,
                artist_id: row.get(1)?,
            })
        })
        .optional()?;
    Ok(found)
}

pub fn get_counts(conn: &Connection) -> rusqlite::Result<WarehouseCounts> {
    let count = |table: &str| -> rusqlite::Result<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count as usize)
    };
    Ok(WarehouseCounts {
        songs: count("songs")?,
        artists: count("artists")?,
        users: count("users")?,
        time: count("time")?,
        songplays: count("songplays")?,
    })
}
