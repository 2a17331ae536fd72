//! # cocktail2md
//!
//! Batch-render cocktail recipe documents from TheCocktailDB.
//!
//! ## What it does
//!
//! Given a `.txt`/`.csv` file of drink names, the pipeline looks each name
//! up against the public TheCocktailDB JSON API, downloads and thumbnails
//! the drink image into run-scoped temp storage, and renders one Markdown
//! document per found drink from a Tera template. Names the catalogue does
//! not know are skipped; the run carries on.
//!
//! ## Pipeline Overview
//!
//! ```text
//! drinks.txt
//!  │
//!  ├─ 1. Input   flatten cells into canonical keys (lowercase, `_`-joined)
//!  ├─ 2. Fetch   one API lookup per key (`random` picks an arbitrary drink)
//!  ├─ 3. Image   download thumbnail → temp/<32-hex>.jpg, shrink to ≤300 px
//!  ├─ 4. Render  fill the recipe template, write recipes/<name>.md
//!  └─ 5. Cleanup temp images removed when the run ends, on every exit path
//! ```
//!
//! Processing is strictly sequential: one key is fully resolved before the
//! next begins, in input-file order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cocktail2md::{run, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::default();
//!     let output = run("drinks.txt", &config).await?;
//!     eprintln!(
//!         "{}/{} recipes rendered",
//!         output.stats.rendered, output.stats.total_keys
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cocktail2md` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! cocktail2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    FilenamePolicy, OverwritePolicy, RunConfig, RunConfigBuilder, DEFAULT_API_BASE_URL,
};
pub use error::CocktailError;
pub use output::{DrinkResult, RunOutput, RunStats};
pub use pipeline::fetch::{IngredientEntry, RecipeRecord};
pub use pipeline::input::RANDOM_KEY;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::{run, run_sync};
