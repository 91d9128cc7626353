//! Count the entries of a directory tree by filesystem type and plot the
//! result.
//!
//! A [`TreeScanner`] walks the tree and produces a [`TypeTally`]. A
//! [`ReportEmitter`] writes that tally to `data.csv` and asks a [`Plotter`]
//! (gnuplot by default) to draw `histogram.png` from it.

pub mod error;
pub mod models;
pub mod plot;
pub mod progress;
pub mod report;
pub mod scanner;

pub use error::{ErrorKind, TallyError};
pub use models::{EntryKind, TypeTally};
pub use plot::{Gnuplot, PlotScript, Plotter};
pub use progress::{ProgressReporter, TerminalProgressReporter};
pub use report::{write_tally, ReportEmitter, ReportPaths, CHART_TITLE, DATA_FILE, IMAGE_FILE};
pub use scanner::TreeScanner;
