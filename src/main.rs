/*!
 * Command-line interface for promptpack
 */

use std::io;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use promptpack::aggregate::Aggregator;
use promptpack::clipboard;
use promptpack::config::{Args, Config};
use promptpack::error::{PromptPackError, Result};
use promptpack::git::GitLister;
use promptpack::modify;
use promptpack::report::{AggregateReport, ReportFormat, Reporter};
use promptpack::select::SelectionEngine;

fn main() {
    let args = Args::parse();

    // Generate shell completions and exit
    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return;
    }

    let config = Config::from_args(args);

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    config.validate()?;

    if config.apply {
        run_apply(&config)
    } else {
        run_aggregate(config)
    }
}

/// Apply mode: clipboard text -> modification block -> filesystem mutations.
/// Malformed input aborts before any mutation.
fn run_apply(config: &Config) -> Result<()> {
    let raw = clipboard::read_from_clipboard()?;
    if raw.trim().is_empty() {
        return Err(PromptPackError::EmptyClipboard);
    }

    let operations = modify::parse(&raw)?;
    let outcome = modify::apply_operations(&config.scan_root, &operations)?;

    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_apply_report(&outcome);

    Ok(())
}

/// Aggregate mode: select -> render -> write -> report
fn run_aggregate(config: Config) -> Result<()> {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) Elapsed: {elapsed_precise}")
            .unwrap(),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("Scanning");
    progress.set_message(format!(
        "Scanning directory: {}",
        config.scan_root.display()
    ));

    let mut engine = SelectionEngine::new(config.clone(), Arc::new(progress.clone()));
    if config.tracked {
        engine = engine.with_lister(Box::new(GitLister));
    }

    progress.set_length(engine.count_candidates());
    progress.set_prefix("Processing");

    let start_time = Instant::now();

    let selection = engine.select()?;

    let aggregator = Aggregator::new(config.clone());
    let rendered = aggregator.render(&selection.files);
    aggregator.write(&rendered)?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    for warning in &rendered.warnings {
        eprintln!("Warning: {}", warning);
    }

    // Clipboard echo is best-effort: unavailability degrades to a warning
    if config.clip {
        match clipboard::copy_to_clipboard(&rendered.text) {
            Ok(()) => println!("Output copied to clipboard"),
            Err(e) => eprintln!("Warning: failed to copy to clipboard: {}", e),
        }
    }

    let report = AggregateReport {
        output_file: display_output(&config.output_file),
        duration,
        file_details: rendered.details,
        skipped: selection.skipped,
    };

    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&report);

    Ok(())
}

fn display_output(path: &Path) -> String {
    path.display().to_string()
}
