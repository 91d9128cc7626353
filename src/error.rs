use colored::*;
use std::fmt;
use std::path::Path;

/// Failure categories a run can end with. Each maps to its own exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Path,
    EntryAccess,
    Report,
    Subprocess,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::Path => 3,
            ErrorKind::EntryAccess => 4,
            ErrorKind::Report => 5,
            ErrorKind::Subprocess => 6,
        }
    }
}

#[derive(Debug)]
pub struct TallyError {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: Option<String>,
}

impl TallyError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "Error:".red().bold(), self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n{} {}", "Suggestion:".yellow().bold(), suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for TallyError {}

/// Builds the error for a scan root that cannot be walked.
pub fn handle_path_error(path: &Path) -> TallyError {
    if !path.exists() {
        TallyError::new(
            ErrorKind::Path,
            format!("Path '{}' does not exist", path.display()),
        )
        .with_suggestion("Check the path and try again. Use '.' for current directory.")
    } else if !path.is_dir() {
        TallyError::new(
            ErrorKind::Path,
            format!("Path '{}' is not a directory", path.display()),
        )
        .with_suggestion("Please provide a directory path, not a file.")
    } else {
        TallyError::new(
            ErrorKind::Path,
            format!("Cannot access path '{}'", path.display()),
        )
        .with_suggestion("Check permissions and try again.")
    }
}

pub fn handle_entry_error(path: Option<&Path>, err: impl fmt::Display) -> TallyError {
    let message = match path {
        Some(path) => format!("Failed to read '{}': {}", path.display(), err),
        None => format!("Failed to read directory entry: {}", err),
    };
    TallyError::new(ErrorKind::EntryAccess, message)
        .with_suggestion("An entry changed or became unreadable during the scan; fix permissions or rerun.")
}

pub fn handle_plotter_missing(program: &str) -> TallyError {
    TallyError::new(
        ErrorKind::Subprocess,
        format!("Plotting program '{}' was not found", program),
    )
    .with_suggestion("Install gnuplot and make sure it is on your PATH.")
}
