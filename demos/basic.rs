use typetally::{EntryKind, ReportEmitter, TreeScanner};

fn main() -> anyhow::Result<()> {
    // Count everything below the current directory
    let scanner = TreeScanner::new();
    let tally = scanner.scan(".")?;

    // Print the tally in report order
    for (kind, count) in tally.iter() {
        println!("{}: {}", kind, count);
    }
    println!("Found {} entries in total", tally.total());
    println!("Found {} regular files", tally.get(EntryKind::Regular));

    // Write data.csv and render histogram.png (needs gnuplot on PATH)
    let paths = ReportEmitter::new()
        .with_output_dir(std::env::temp_dir())
        .emit(&tally)?;
    println!("Report written to {}", paths.data.display());

    Ok(())
}
