use crate::error::{ErrorKind, TallyError};
use crate::models::TypeTally;
use crate::plot::{Gnuplot, PlotScript, Plotter};
use anyhow::Result;
use csv::{QuoteStyle, WriterBuilder};
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const DATA_FILE: &str = "data.csv";
pub const IMAGE_FILE: &str = "histogram.png";
pub const CHART_TITLE: &str = "frequency";

/// Where an emitted report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub data: PathBuf,
    pub image: PathBuf,
}

/// Writes the tally as `<label>,<count>` rows, one per category in report
/// order. Any existing file is truncated.
pub fn write_tally(tally: &TypeTally, path: &Path) -> Result<()> {
    let report_error = |err: csv::Error| {
        TallyError::new(
            ErrorKind::Report,
            format!("Failed to write '{}': {}", path.display(), err),
        )
        .with_suggestion("Check that the output directory is writable.")
    };

    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote(b'|')
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false)
        .from_path(path)
        .map_err(report_error)?;

    for (kind, count) in tally.iter() {
        let count = count.to_string();
        writer
            .write_record([kind.label(), count.as_str()])
            .map_err(report_error)?;
    }

    writer.flush().map_err(|err| {
        TallyError::new(
            ErrorKind::Report,
            format!("Failed to write '{}': {}", path.display(), err),
        )
    })?;

    debug!("Wrote tally to {}", path.display());
    Ok(())
}

/// Persists a tally to `data.csv` and renders `histogram.png` from it.
pub struct ReportEmitter {
    output_dir: PathBuf,
    plotter: Box<dyn Plotter>,
}

impl Default for ReportEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEmitter {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            plotter: Box::new(Gnuplot::new()),
        }
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_plotter(mut self, plotter: Box<dyn Plotter>) -> Self {
        self.plotter = plotter;
        self
    }

    pub fn script(&self) -> PlotScript {
        PlotScript::new(DATA_FILE, IMAGE_FILE, CHART_TITLE)
    }

    /// Writes the data file, closes it, then blocks on the plotter.
    pub fn emit(&self, tally: &TypeTally) -> Result<ReportPaths> {
        let paths = ReportPaths {
            data: self.output_dir.join(DATA_FILE),
            image: self.output_dir.join(IMAGE_FILE),
        };

        write_tally(tally, &paths.data)?;
        self.plotter.render(&self.script(), &self.output_dir)?;

        info!(
            "Report written to {} and {}",
            paths.data.display(),
            paths.image.display()
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Captures scripts and the data file contents seen at plot time.
    #[derive(Clone, Default)]
    struct RecordingPlotter {
        calls: Rc<RefCell<Vec<(PlotScript, String)>>>,
    }

    impl Plotter for RecordingPlotter {
        fn render(&self, script: &PlotScript, working_dir: &Path) -> Result<()> {
            let data = fs::read_to_string(working_dir.join(&script.data_file))?;
            self.calls.borrow_mut().push((script.clone(), data));
            Ok(())
        }
    }

    struct FailingPlotter;

    impl Plotter for FailingPlotter {
        fn render(&self, _script: &PlotScript, _working_dir: &Path) -> Result<()> {
            Err(TallyError::new(ErrorKind::Subprocess, "plotter exploded").into())
        }
    }

    fn sample_tally() -> TypeTally {
        let mut tally: TypeTally = vec![
            EntryKind::Regular,
            EntryKind::Regular,
            EntryKind::Regular,
            EntryKind::Directory,
            EntryKind::Character,
        ]
        .into_iter()
        .collect();
        tally.record_unknown();
        tally
    }

    #[test]
    fn test_write_tally_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DATA_FILE);

        write_tally(&sample_tally(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "regular,3\ndirectory,1\nlink,0\nfifo,0\nsocket,0\nblock,0\ncharacter,1\n"
        );
    }

    #[test]
    fn test_empty_tally_still_has_seven_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DATA_FILE);

        write_tally(&TypeTally::new(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|line| line.ends_with(",0")));
    }

    #[test]
    fn test_rewrite_replaces_previous_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DATA_FILE);
        fs::write(&path, "stale,99\n".repeat(20)).unwrap();

        write_tally(&sample_tally(), &path).unwrap();
        write_tally(&TypeTally::new(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 7);
        assert!(!content.contains("stale"));
        assert!(content.starts_with("regular,0\n"));
    }

    #[test]
    fn test_write_into_missing_directory_is_report_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join(DATA_FILE);

        let err = write_tally(&TypeTally::new(), &path).unwrap_err();
        let tally_err = err.downcast_ref::<TallyError>().unwrap();
        assert_eq!(tally_err.kind, ErrorKind::Report);
    }

    #[test]
    fn test_emit_writes_data_before_plotting() {
        let temp_dir = TempDir::new().unwrap();
        let plotter = RecordingPlotter::default();
        let calls = plotter.calls.clone();
        let emitter = ReportEmitter::new()
            .with_output_dir(temp_dir.path())
            .with_plotter(Box::new(plotter));

        let paths = emitter.emit(&sample_tally()).unwrap();

        assert_eq!(paths.data, temp_dir.path().join("data.csv"));
        assert_eq!(paths.image, temp_dir.path().join("histogram.png"));

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        let (script, data_at_plot_time) = &calls[0];
        assert_eq!(script, &PlotScript::new("data.csv", "histogram.png", "frequency"));
        assert!(data_at_plot_time.starts_with("regular,3\n"));
        assert_eq!(data_at_plot_time.lines().count(), 7);
    }

    #[test]
    fn test_emit_surfaces_plotter_failure() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = ReportEmitter::new()
            .with_output_dir(temp_dir.path())
            .with_plotter(Box::new(FailingPlotter));

        let err = emitter.emit(&TypeTally::new()).unwrap_err();

        let tally_err = err.downcast_ref::<TallyError>().unwrap();
        assert_eq!(tally_err.kind, ErrorKind::Subprocess);
        // The data file is still left behind.
        assert!(temp_dir.path().join(DATA_FILE).exists());
    }
}
