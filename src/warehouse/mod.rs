mod connection;
pub mod models;
mod schema;
pub mod store;

pub use connection::{initialize_database, open_warehouse, reset_schema};
pub use models::{
    ArtistRow, Level, SongMatch, SongRow, SongplayRow, TimeRow, UserRow, WarehouseCounts,
};
pub use schema::current_schema;
