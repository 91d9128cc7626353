use clap::{Parser, ValueEnum};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use typetally::{
    ErrorKind, ReportEmitter, TallyError, TerminalProgressReporter, TreeScanner, TypeTally,
};

#[derive(Parser, Debug)]
#[command(name = "typetally")]
#[command(about = "Count filesystem entries by type and plot them as a histogram")]
#[command(version)]
struct Cli {
    /// Directory to scan
    path: PathBuf,

    /// How to print the tally after the report is written
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Show a progress spinner while scanning
    #[arg(short, long)]
    progress: bool,

    /// Log every discovered directory
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(ErrorKind::Usage.exit_code())
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TallyError>() {
                Some(tally_err) => eprintln!("{}", tally_err),
                None => eprintln!("{} {:#}", "Error:".red().bold(), err),
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut scanner = TreeScanner::new();
    if cli.progress {
        scanner = scanner.with_progress_reporter(Box::new(TerminalProgressReporter::new()));
    }

    let start = std::time::Instant::now();
    let tally = scanner.scan(&cli.path)?;
    let duration = start.elapsed();

    let paths = ReportEmitter::new().emit(&tally)?;

    match cli.format {
        OutputFormat::Pretty => {
            print_summary(&tally);
            println!(
                "\n{} Wrote {} and {}",
                "📁".cyan(),
                paths.data.display().to_string().green(),
                paths.image.display().to_string().green()
            );
            println!(
                "{} Scanned in {:.2}ms",
                "⚡".bright_yellow(),
                duration.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tally)?);
        }
    }

    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<TallyError>()
        .map(TallyError::exit_code)
        .unwrap_or(1)
}

fn print_summary(tally: &TypeTally) {
    println!("{} Entry Type Summary:", "📊".cyan());
    println!("{}", "=".repeat(40));

    for (kind, count) in tally.iter() {
        println!("{:15} {:>8}", kind.label().purple(), count.to_string().yellow());
    }

    println!("{}", "-".repeat(40));
    println!(
        "{:15} {:>8}",
        "TOTAL".bold(),
        tally.total().to_string().bold().yellow()
    );

    if tally.unknown() > 0 {
        println!(
            "{:15} {:>8}",
            "unrecognized".dimmed(),
            tally.unknown().to_string().dimmed()
        );
    }
}
