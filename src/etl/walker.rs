//! File discovery and the per-file load loop.

use super::{EtlError, FileProcessor, RowCounts};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

const INPUT_EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: EtlError,
}

/// Input files found below a root, plus the entries the walk could not read.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<FileFailure>,
}

/// Every `.json` file below `root`, as sorted absolute paths.
///
/// Unreadable entries (e.g. a directory without read permission) are
/// logged, collected and skipped. Only a missing root is an error.
pub fn discover_json_files(root: &Path) -> Result<Discovery, EtlError> {
    let root = root.canonicalize().map_err(|e| EtlError::io(root, e))?;

    let mut discovery = Discovery::default();
    for entry in WalkDir::new(&root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                warn!("Skipping unreadable entry {}: {}", path.display(), e);
                discovery.unreadable.push(FileFailure {
                    path,
                    error: EtlError::Walk(e),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(INPUT_EXTENSION) {
            discovery.files.push(entry.into_path());
        }
    }
    discovery.files.sort();
    Ok(discovery)
}

/// Outcome of running one processor over one directory tree.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub files_found: usize,
    pub files_loaded: usize,
    pub failures: Vec<FileFailure>,
    pub rows: RowCounts,
}

impl ProcessReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load every file below `root` with `processor`, one transaction per file.
///
/// A file that fails is logged, rolled back and recorded in the report; the
/// walk carries on with the next file. Unreadable directory entries are
/// recorded as failures too. Only a missing root and transaction handling
/// errors abort the whole run.
pub fn process_data(
    conn: &mut Connection,
    root: &Path,
    processor: &dyn FileProcessor,
) -> Result<ProcessReport, EtlError> {
    let Discovery { files, unreadable } = discover_json_files(root)?;
    let total = files.len();
    info!("{} {} files found in {}", total, processor.name(), root.display());

    let mut report = ProcessReport {
        files_found: total,
        failures: unreadable,
        ..Default::default()
    };

    for (index, path) in files.into_iter().enumerate() {
        let tx = conn.transaction()?;
        let result = processor.process(&tx, &path);
        match result {
            Ok(rows) => {
                tx.commit()?;
                report.rows += rows;
                report.files_loaded += 1;
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                tx.rollback()?;
                report.failures.push(FileFailure { path, error: e });
            }
        }
        info!("{}/{} files processed.", index + 1, total);
    }

    Ok(report)
}
