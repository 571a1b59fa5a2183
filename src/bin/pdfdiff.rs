//! CLI binary for edgequake-pdfdiff.
//!
//! A thin shim over the library crate that maps CLI flags to `CompareConfig`,
//! prints the report and turns the verdict into an exit code.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfdiff::{
    compare_files, error::EXIT_DOCUMENT_ERROR, CompareConfig, ComparisonProgressCallback,
    DocumentVerdict, PdfDiffError, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints the `--verbose` report on stdout and drives the optional
/// `--progress` bar on stderr.
struct CliReporter {
    verbose: bool,
    bar: Option<ProgressBar>,
}

impl CliReporter {
    fn new(verbose: bool, progress: bool) -> Arc<Self> {
        let bar = progress.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} pages  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Comparing");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self { verbose, bar })
    }

    /// Print a report line on stdout without tearing the progress bar.
    fn report(&self, line: String) {
        if !self.verbose {
            return;
        }
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl ComparisonProgressCallback for CliReporter {
    fn on_comparison_start(&self, pages_first: usize, pages_second: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(pages_first.max(pages_second) as u64);
            bar.reset_eta();
        }
        if pages_first != pages_second {
            self.report(format!(
                "pages count differs: {pages_first} vs {pages_second}"
            ));
        }
    }

    fn on_page_compared(&self, page_num: usize, _pages_total: usize, differs: bool) {
        if differs {
            self.report(format!("page {page_num} differs"));
        }
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("page {page_num}"));
            bar.inc(1);
        }
    }

    fn on_comparison_complete(&self, pages_differ: usize, pages_total: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.report(format!("{pages_differ} of {pages_total} pages differ."));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Exit status only: 0 when identical, 1 when different
  pdfdiff before.pdf after.pdf

  # Write a diff PDF with changed rows marked in the margin
  pdfdiff --mark-differences --output-diff=diff.pdf before.pdf after.pdf

  # Only keep pages that changed, compare at screen resolution
  pdfdiff -s --dpi=96 --output-diff=changes.pdf before.pdf after.pdf

  # Ignore small anti-aliasing differences
  pdfdiff --channel-tolerance=8 before.pdf after.pdf

  # Machine-readable per-page report
  pdfdiff --json before.pdf after.pdf

EXIT STATUS:
  0  documents are identical
  1  documents differ
  2  invalid arguments
  3  a document could not be opened, rendered or written

ENVIRONMENT VARIABLES:
  PDFDIFF_DPI                Default for --dpi
  PDFDIFF_CHANNEL_TOLERANCE  Default for --channel-tolerance
  PDFIUM_LIB_PATH            Path to an existing libpdfium
  PDFIUM_AUTO_CACHE_DIR      Override the pdfium cache directory
  RUST_LOG                   Log filter (default: warn, info with --verbose)
"#;

/// Compare two PDF files visually.
#[derive(Parser, Debug)]
#[command(
    name = "pdfdiff",
    version,
    about = "Compare two PDF files visually, page by page",
    long_about = "Rasterise both PDF files and compare them pixel by pixel. Exits with 0 when \
they look identical and 1 when they differ. Optionally writes a diff PDF where content only in \
the first file is blue and content only in the second file is yellow.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// First (baseline) PDF file.
    file1: PathBuf,

    /// Second PDF file.
    file2: PathBuf,

    /// Report differing pages on stdout.
    #[arg(short, long)]
    verbose: bool,

    /// Leave pages without differences out of the diff PDF.
    #[arg(short, long)]
    skip_identical: bool,

    /// Mark changed rows with a blue bar in the left margin.
    #[arg(short, long)]
    mark_differences: bool,

    /// Compose the diff from grayscale versions of both pages.
    #[arg(short, long)]
    grayscale: bool,

    /// Rasterisation resolution (1–2400).
    #[arg(long, env = "PDFDIFF_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..=2400))]
    dpi: u32,

    /// Write a diff PDF to this path.
    #[arg(long, value_name = "PATH")]
    output_diff: Option<PathBuf>,

    /// Largest per-channel difference still treated as equal (0–255).
    #[arg(long, env = "PDFDIFF_CHANNEL_TOLERANCE", default_value_t = 0,
          value_parser = clap::value_parser!(u8))]
    channel_tolerance: u8,

    /// Print the verdict as JSON, with one flag per page.
    #[arg(long)]
    json: bool,

    /// Show a progress bar on stderr.
    #[arg(long)]
    progress: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(verdict) if verdict.is_identical() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {:#}", red("error:"), err);
            let code = err
                .downcast_ref::<PdfDiffError>()
                .map_or(EXIT_DOCUMENT_ERROR, PdfDiffError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<DocumentVerdict> {
    // The JSON report owns stdout, so the text report stays off.
    let reporter = CliReporter::new(cli.verbose && !cli.json, cli.progress);

    let config = CompareConfig::builder()
        .dpi(cli.dpi)
        .channel_tolerance(cli.channel_tolerance)
        .grayscale(cli.grayscale)
        .mark_differences(cli.mark_differences)
        .skip_identical(cli.skip_identical)
        .verbose(cli.verbose)
        .progress_callback(reporter as ProgressCallback)
        .build()?;

    let verdict = compare_files(
        &cli.file1,
        &cli.file2,
        cli.output_diff.as_deref(),
        cli.json,
        &config,
    )
    .with_context(|| {
        format!(
            "Comparing {} with {}",
            cli.file1.display(),
            cli.file2.display()
        )
    })?;

    if cli.json {
        let json = serde_json::to_string_pretty(&verdict).context("Failed to serialise verdict")?;
        println!("{json}");
    }

    if let Some(ref path) = cli.output_diff {
        if cli.verbose && !cli.json {
            eprintln!(
                "{} {}",
                if verdict.is_identical() {
                    green("✔")
                } else {
                    red("✘")
                },
                bold(&path.display().to_string())
            );
        }
    }

    Ok(verdict)
}
