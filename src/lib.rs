//! Sparkify ETL Library
//!
//! Loads song catalog and listening event files into a SQLite star schema.
//! The binaries are thin wrappers around these modules.

pub mod config;
pub mod etl;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use etl::{process_data, EtlError, FileProcessor, LogFileProcessor, SongFileProcessor};
pub use warehouse::{initialize_database, open_warehouse, reset_schema};
