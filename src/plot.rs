use crate::error::{handle_plotter_missing, ErrorKind, TallyError};
use anyhow::Result;
use log::debug;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

pub const DEFAULT_PLOT_PROGRAM: &str = "gnuplot";

/// Parameters of the bar chart script handed to the plotting program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotScript {
    pub data_file: String,
    pub output_file: String,
    pub title: String,
}

impl PlotScript {
    pub fn new(
        data_file: impl Into<String>,
        output_file: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            data_file: data_file.into(),
            output_file: output_file.into(),
            title: title.into(),
        }
    }

    /// Renders the gnuplot commands: comma separated input, true-color PNG,
    /// grid, vertical category labels, one solid bar per row using column 2
    /// as height and column 1 as the label.
    pub fn render(&self) -> String {
        format!(
            "set datafile separator ','\n\
             set terminal png truecolor\n\
             set output {output}\n\
             set grid\n\
             set xtics rotate by 90\n\
             set style data histograms\n\
             set style fill solid 1.00 border -1\n\
             plot {data} using 2:xtic(1) title {title}\n",
            output = quote(&self.output_file),
            data = quote(&self.data_file),
            title = quote(&self.title),
        )
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Something that can turn a plot script into an image.
pub trait Plotter {
    /// Runs the script with `working_dir` as the current directory, so the
    /// script's relative file names resolve there. Blocks until done.
    fn render(&self, script: &PlotScript, working_dir: &Path) -> Result<()>;
}

/// Runs gnuplot as a child process and feeds it the script on stdin.
#[derive(Debug, Clone)]
pub struct Gnuplot {
    program: String,
}

impl Default for Gnuplot {
    fn default() -> Self {
        Self::new()
    }
}

impl Gnuplot {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PLOT_PROGRAM.to_string(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Plotter for Gnuplot {
    fn render(&self, script: &PlotScript, working_dir: &Path) -> Result<()> {
        debug!(
            "Running {} in {} to produce {}",
            self.program,
            working_dir.display(),
            script.output_file
        );

        let mut child = Command::new(&self.program)
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => handle_plotter_missing(&self.program),
                _ => TallyError::new(
                    ErrorKind::Subprocess,
                    format!("Failed to start '{}': {}", self.program, err),
                ),
            })?;

        // Dropping stdin closes the pipe so the child sees EOF.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(script.render().as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output().map_err(|err| {
            TallyError::new(
                ErrorKind::Subprocess,
                format!("Failed waiting for '{}': {}", self.program, err),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut message = format!("'{}' exited with {}", self.program, output.status);
            if !stderr.trim().is_empty() {
                message.push_str(&format!(": {}", stderr.trim()));
            }
            return Err(TallyError::new(ErrorKind::Subprocess, message).into());
        }

        write_result.map_err(|err| {
            TallyError::new(
                ErrorKind::Subprocess,
                format!("Failed to send plot script to '{}': {}", self.program, err),
            )
        })?;

        Ok(())
    }
}
