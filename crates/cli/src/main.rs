//! CLI tool for sorting question banks by pinyin.

use anyhow::{bail, Result};
use clap::Parser;
use qbank_core::{log_channel, LogDrain, OutputFormat};
use qbank_pipeline::{process_with_options, ProcessOptions, SaveReport};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Extract questions from documents and write them sorted by pinyin.
#[derive(Parser, Debug)]
#[command(name = "qbank-sort")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input files (.pdf, .docx, .doc, .txt, .xlsx, .xls), processed in order
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output base path without extension; writes <base>.docx, <base>.xlsx and <base>.txt
    #[arg(short, long)]
    output: PathBuf,

    /// Title of the Word document
    #[arg(short, long)]
    title: Option<String>,

    /// Name of the Excel worksheet
    #[arg(long)]
    sheet_name: Option<String>,

    /// Milliseconds between progress log polls
    #[arg(long, default_value = "100")]
    poll_ms: u64,

    /// Maximum number of pending progress lines
    #[arg(long, default_value = "1024")]
    queue: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut options = ProcessOptions::new();
    if let Some(title) = &args.title {
        options = options.with_title(title.clone());
    }
    if let Some(name) = &args.sheet_name {
        options = options.with_sheet_name(name.clone());
    }

    let (sink, drain) = log_channel(args.queue);
    let input = args.input.clone();
    let output = args.output.clone();

    let worker = thread::spawn(move || process_with_options(input.as_slice(), &output, &options, &sink));

    let poll = Duration::from_millis(args.poll_ms.max(1));
    while !worker.is_finished() {
        print_lines(&drain);
        thread::sleep(poll);
    }

    let report = match worker.join() {
        Ok(report) => report,
        Err(_) => bail!("Processing thread panicked"),
    };
    print_lines(&drain);

    summarize(&report)
}

/// Print every queued progress line.
fn print_lines(drain: &LogDrain) {
    for line in drain.drain() {
        println!("{}", line);
    }
}

fn summarize(report: &SaveReport) -> Result<()> {
    for format in OutputFormat::ALL {
        let status = match report.succeeded(format) {
            Some(true) => "saved",
            Some(false) => "failed",
            None => "skipped",
        };
        let path = report
            .path(format)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        println!("{:<6} {:<7} {}", format, status, path);
    }

    if !report.any_succeeded() {
        bail!("No output files could be saved");
    }

    println!(
        "Sorted {} questions into {}/3 formats",
        report.record_count,
        report.success_count()
    );
    Ok(())
}
