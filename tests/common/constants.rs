//! Test data shared by the end-to-end tests

#![allow(dead_code)]

pub const SONG_ID: &str = "S1";
pub const ARTIST_ID: &str = "A1";
pub const USER_ID: &str = "10";
pub const EVENT_TS: i64 = 1541121934796;

pub const SONG_JSON: &str = r#"{"num_songs":1,"song_id":"S1","title":"T","artist_id":"A1","year":2000,"duration":210.5,"artist_name":"Band","artist_location":"NYC","artist_latitude":40.7,"artist_longitude":-74.0}"#;

pub const OTHER_SONG_JSON: &str = r#"{"num_songs":1,"song_id":"S2","title":"Other Song","artist_id":"A2","year":0,"duration":180.0,"artist_name":"Other Band","artist_location":"","artist_latitude":null,"artist_longitude":null}"#;

pub const NEXT_SONG_EVENT: &str = r#"{"page":"NextSong","ts":1541121934796,"userId":"10","firstName":"A","lastName":"B","gender":"F","level":"free","song":"T","artist":"Band","length":210.5,"sessionId":1,"location":"X","userAgent":"UA"}"#;

pub const UNMATCHED_EVENT: &str = r#"{"page":"NextSong","ts":1541121999000,"userId":"10","firstName":"A","lastName":"B","gender":"F","level":"paid","song":"Nobody Knows","artist":"Band","length":210.5,"sessionId":1,"location":"X","userAgent":"UA"}"#;

pub const HOME_EVENT: &str = r#"{"page":"Home","ts":1541121000000,"userId":"11","firstName":"C","lastName":"D","gender":"M","level":"free","song":null,"artist":null,"length":null,"sessionId":2,"location":"Y","userAgent":"UA"}"#;
