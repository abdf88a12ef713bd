//! Report command handlers for the CLI.

use std::path::{Path, PathBuf};

use adboard_reports::{
    metrics::change_label, parse_entry_line, template_csv, ImportError, ManualEntryError,
    ReportSession, ValidationError, FORMAT_GUIDE, TEMPLATE_FILE_NAME,
};
use clap::Subcommand;

/// Sub-commands available under `report`.
#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    /// Import a CSV report and print its metric cards and optimization tips
    Analyze {
        /// Path to the CSV document
        file: PathBuf,

        /// Extra record in column order, e.g. `01-01-2024,Facebook,100,10,1,50,80`
        #[arg(long = "entry")]
        entries: Vec<String>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the sample CSV template
    Template {
        /// Destination file; prints to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the CSV format guide
    Guide,
}

fn print_violations(violations: &[ValidationError]) {
    for violation in violations {
        eprintln!("  {violation}");
    }
}

/// Imports `file`, appends each manual entry, then prints the analysis.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the document is rejected, or
/// any entry fails to parse or validate. Nothing is printed for a partial set.
pub(crate) fn run_analyze(file: &Path, entries: &[String], json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;

    let mut session = ReportSession::new();
    match session.import_csv(&text) {
        Ok(count) => tracing::info!(records = count, file = %file.display(), "report imported"),
        Err(ImportError::Validation(violations)) => {
            print_violations(&violations);
            anyhow::bail!("{} validation error(s) found", violations.len());
        }
        Err(e) => return Err(e.into()),
    }

    for (index, line) in entries.iter().enumerate() {
        let row = parse_entry_line(line)
            .map_err(|e| anyhow::anyhow!("entry {}: {e}", index + 1))?;
        if let Err(e) = session.add_manual(row) {
            if let ManualEntryError::Invalid(violations) = &e {
                print_violations(violations);
            }
            anyhow::bail!("entry {}: {e}", index + 1);
        }
    }

    let analysis = session.analysis();
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{} record(s)", session.records().len());
    println!();
    for card in &analysis.cards {
        match change_label(card) {
            Some(change) => println!("{:<16} {:>16}  {change}", card.title, card.value),
            None => println!("{:<16} {:>16}", card.title, card.value),
        }
    }

    if analysis.tips.is_empty() {
        println!();
        println!("no optimization tips for this data");
    } else {
        println!();
        for tip in &analysis.tips {
            println!("[{}] {}", tip.impact, tip.title);
            println!("    {}", tip.description);
        }
    }
    Ok(())
}

/// Writes the template to `output`, or stdout when `None`.
///
/// # Errors
///
/// Returns an error if the CSV cannot be rendered or the file cannot be written.
pub(crate) fn run_template(output: Option<&Path>) -> anyhow::Result<()> {
    let csv = template_csv()?;
    match output {
        Some(path) => {
            std::fs::write(path, csv)?;
            println!("wrote {} to {}", TEMPLATE_FILE_NAME, path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub(crate) fn run_guide() {
    println!("{FORMAT_GUIDE}");
}
