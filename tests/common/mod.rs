//! Common test infrastructure
//!
//! Tests build a warehouse in a temporary directory together with song and
//! log data trees, then drive the loader through the public API.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestWarehouse, SONG_JSON};
//!
//! #[test]
//! fn test_load_song() {
//!     let mut warehouse = TestWarehouse::create();
//!     warehouse.write_song_file("A/A/S1.json", SONG_JSON);
//!     warehouse.load_songs();
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::TestWarehouse;
