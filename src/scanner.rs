use crate::error::{handle_entry_error, handle_path_error, TallyError};
use crate::models::{EntryKind, TypeTally};
use crate::progress::ProgressReporter;
use anyhow::Result;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Walks a directory tree and counts its entries by type.
pub struct TreeScanner {
    pub(crate) progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeScanner {
    pub fn new() -> Self {
        Self {
            progress_reporter: None,
        }
    }

    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Scans everything below `root_path`. The root itself is not counted and
    /// symlinks are never followed.
    ///
    /// Fails if the root is not a readable directory, or if any entry below it
    /// cannot be read. Nothing is skipped.
    pub fn scan<P: AsRef<Path>>(&self, root_path: P) -> Result<TypeTally> {
        let root = root_path.as_ref();

        match fs::metadata(root) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Err(handle_path_error(root).into()),
        }

        if let Some(reporter) = &self.progress_reporter {
            reporter.start();
        }

        let mut tally = TypeTally::new();
        let mut visited: u64 = 0;

        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    debug!("Cannot read root {}: {}", root.display(), err);
                    return Err(handle_path_error(root).into());
                }
                Err(err) => return Err(walk_error(&err).into()),
            };

            let metadata = entry.metadata().map_err(|err| walk_error(&err))?;

            match EntryKind::from_metadata(&metadata) {
                Some(kind) => {
                    if kind == EntryKind::Directory {
                        debug!("Discovered directory {}", entry.path().display());
                    }
                    tally.record(kind);
                }
                None => {
                    warn!(
                        "Entry {} has an unrecognized file type, not counted",
                        entry.path().display()
                    );
                    tally.record_unknown();
                }
            }

            visited += 1;
            if let Some(reporter) = &self.progress_reporter {
                reporter.update(visited);
            }
        }

        if let Some(reporter) = &self.progress_reporter {
            reporter.finish(visited);
        }

        info!(
            "Scanned {} entries under {} ({} of unknown type)",
            visited,
            root.display(),
            tally.unknown()
        );

        Ok(tally)
    }
}

/// walkdir's own message already names the path, so only its io cause is kept.
fn walk_error(err: &walkdir::Error) -> TallyError {
    match err.io_error() {
        Some(io_err) => handle_entry_error(err.path(), io_err),
        None => handle_entry_error(err.path(), err),
    }
}
