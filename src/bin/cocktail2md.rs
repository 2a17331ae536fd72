//! CLI binary for cocktail2md.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use cocktail2md::{
    run, FilenamePolicy, OverwritePolicy, ProgressCallback, RunConfig, RunProgressCallback,
    DEFAULT_API_BASE_URL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per
/// drink. The pipeline is sequential, so lines arrive in input order.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-drink wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_run_start` (called
    /// once the input file has been collected).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading input file…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} drinks  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Mixing");
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_drinks: usize) {
        self.activate_bar(total_drinks);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "{total_drinks} drinks found in file. Looking for recipes…"
            ))
        ));
    }

    fn on_drink_start(&self, index: usize, _total: usize, key: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(index, Instant::now());
        self.bar.set_message(key.to_string());
    }

    fn on_drink_rendered(&self, index: usize, total: usize, name: &str, document: &Path) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<28}  {}  {}",
            green("✓"),
            index,
            total,
            name,
            dim(&document.display().to_string()),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_drink_not_found(&self, index: usize, total: usize, key: &str) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<28}  {}  {}",
            yellow("–"),
            index,
            total,
            key,
            yellow("not found"),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total: usize, rendered: usize) {
        let not_found = total.saturating_sub(rendered);
        self.bar.finish_and_clear();

        if not_found == 0 {
            eprintln!(
                "{} {} recipes rendered",
                green("✔"),
                bold(&rendered.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} recipes rendered  ({} not found)",
                if rendered == 0 { yellow("⚠") } else { cyan("⚠") },
                bold(&rendered.to_string()),
                total,
                yellow(&not_found.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render every drink named in the file
  cocktail2md drinks.txt

  # CSV input, custom output directory
  cocktail2md shopping.csv --output-dir out/cards

  # Use your own Tera template
  cocktail2md drinks.txt --template my-card.md.tera

  # Refuse to clobber existing documents, sanitize odd recipe names
  cocktail2md drinks.txt --overwrite error --sanitize-filenames

  # Machine-readable run report
  cocktail2md drinks.txt --json > report.json

INPUT FILE FORMAT:
  Comma-delimited text (.txt or .csv), any number of rows and columns.
  Every non-empty cell is one drink name; cells are trimmed, lowercased,
  and spaces become underscores before lookup. The reserved name `random`
  asks the catalogue for an arbitrary drink.

OUTPUT:
  One Markdown document per found drink in the output directory, named
  after the recipe. Drinks the catalogue does not know are skipped, and
  the run continues.

ENVIRONMENT VARIABLES:
  COCKTAIL2MD_API_URL      Override the recipe API base URL
  COCKTAIL2MD_OUTPUT_DIR   Override the output directory
  COCKTAIL2MD_TEMPLATE     Override the document template
"#;

/// Render cocktail recipe documents from a list of drink names.
#[derive(Parser, Debug)]
#[command(
    name = "cocktail2md",
    version,
    about = "Render cocktail recipe documents from a list of drink names",
    long_about = "Read a .txt/.csv file of cocktail names, look each one up against \
TheCocktailDB, download and thumbnail the drink image, and render one Markdown \
document per found recipe from a Tera template.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file of drink names (.txt or .csv).
    input: PathBuf,

    /// Directory the rendered documents are written to.
    #[arg(short, long, env = "COCKTAIL2MD_OUTPUT_DIR", default_value = "recipes")]
    output_dir: PathBuf,

    /// Directory relative paths resolve against.
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Tera template overriding the built-in recipe card.
    #[arg(short, long, env = "COCKTAIL2MD_TEMPLATE")]
    template: Option<PathBuf>,

    /// Recipe API base URL.
    #[arg(long, env = "COCKTAIL2MD_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Timeout for every remote call, in seconds.
    #[arg(long, env = "COCKTAIL2MD_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Thumbnail bound in pixels (shrink-only, aspect preserved).
    #[arg(long, env = "COCKTAIL2MD_THUMBNAIL_PX", default_value_t = 300)]
    thumbnail_px: u32,

    /// Square size of the image embed in the document.
    #[arg(long, env = "COCKTAIL2MD_EMBED_PX", default_value_t = 80)]
    embed_px: u32,

    /// Replace path-unsafe characters in output filenames with '_'.
    #[arg(long)]
    sanitize_filenames: bool,

    /// What to do when an output document already exists.
    #[arg(long, value_enum, default_value = "overwrite")]
    overwrite: OverwriteArg,

    /// Print the run report as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "COCKTAIL2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OverwriteArg {
    Overwrite,
    Skip,
    Error,
}

impl From<OverwriteArg> for OverwritePolicy {
    fn from(v: OverwriteArg) -> Self {
        match v {
            OverwriteArg::Overwrite => OverwritePolicy::Overwrite,
            OverwriteArg::Skip => OverwritePolicy::Skip,
            OverwriteArg::Error => OverwritePolicy::Error,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn RunProgressCallback>)
    } else {
        None
    };

    let mut builder = RunConfig::builder()
        .base_dir(&cli.base_dir)
        .output_dir(&cli.output_dir)
        .api_base_url(&cli.api_url)
        .timeout_secs(cli.timeout)
        .thumbnail_px(cli.thumbnail_px)
        .embed_px(cli.embed_px)
        .filename_policy(if cli.sanitize_filenames {
            FilenamePolicy::Sanitize
        } else {
            FilenamePolicy::Verbatim
        })
        .overwrite(cli.overwrite.into());

    if let Some(ref template) = cli.template {
        builder = builder.template_path(template);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let output = run(&cli.input, &config).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        // The callback already printed per-drink lines and the final tick.
        if !show_progress {
            eprintln!(
                "{}/{} recipes rendered",
                output.stats.rendered, output.stats.total_keys
            );
        }
        eprintln!(
            "{}  {}  {}",
            green("Done!"),
            dim(&config.output_path().display().to_string()),
            dim(&format!("{}ms", output.stats.duration_ms)),
        );
    }

    Ok(())
}
