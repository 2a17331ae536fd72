//! Run orchestration: the top-level entry points.
//!
//! One run is strictly sequential — each key is fully resolved
//! (lookup → image → render) before the next begins, in input-file order.
//! There is no retry logic and no cancellation path; a transport failure
//! anywhere aborts the whole run with a typed error.
//!
//! The temp directory holding downloaded images is owned here as a
//! [`TempStore`], so it is removed when the run ends — on success, on a
//! fatal error, even on a panic. Early `?` returns drop it like any other
//! local.

use crate::config::RunConfig;
use crate::error::CocktailError;
use crate::output::{DrinkResult, RunOutput, RunStats};
use crate::pipeline::image::TempStore;
use crate::pipeline::{fetch, input, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Process one input file end to end.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_path` — path to a `.txt` or `.csv` file of drink names
/// * `config`     — run configuration
///
/// # Returns
/// `Ok(RunOutput)` with one [`DrinkResult`] per input key, in input order.
/// Keys the catalogue had no match for are skipped, not errors.
///
/// # Errors
/// Returns `Err(CocktailError)` for fatal conditions only: a missing or
/// unsupported input file, any remote transport failure (lookup or image
/// fetch), or a template/output failure.
pub async fn run(
    input_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunOutput, CocktailError> {
    let start = Instant::now();
    let input_path = input_path.as_ref();

    // ── Step 1: Validate and collect input ───────────────────────────────
    input::validate_input_path(input_path)?;
    let keys = input::collect(input_path)?;
    info!("{} drinks found in {}", keys.len(), input_path.display());

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(keys.len());
    }

    // ── Step 2: Build the HTTP client ────────────────────────────────────
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("cocktail2md/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CocktailError::Internal(format!("Failed to build HTTP client: {e}")))?;

    // ── Step 3: Resolve each key, one at a time, in input order ──────────
    let temp = TempStore::new();
    let total = keys.len();
    let mut drinks = Vec::with_capacity(total);
    let mut rendered = 0usize;

    for (i, key) in keys.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_drink_start(index, total, key);
        }

        match fetch::fetch_recipe(&client, key, &temp, config).await? {
            Some(record) => {
                let document = render::render_document(&record, config).await?;
                rendered += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_drink_rendered(index, total, &record.name, &document);
                }
                drinks.push(DrinkResult {
                    key: key.clone(),
                    name: Some(record.name),
                    document: Some(document),
                });
            }
            None => {
                debug!("Skipping '{}': no matching drink", key);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_drink_not_found(index, total, key);
                }
                drinks.push(DrinkResult {
                    key: key.clone(),
                    name: None,
                    document: None,
                });
            }
        }
    }

    // `temp` drops here, removing every downloaded image.
    let stats = RunStats {
        total_keys: total,
        rendered,
        not_found: total - rendered,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Run complete: {}/{} recipes rendered in {}ms",
        stats.rendered, stats.total_keys, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, rendered);
    }

    Ok(RunOutput { drinks, stats })
}

/// Synchronous wrapper around [`run`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    input_path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunOutput, CocktailError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CocktailError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run(input_path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RunProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingCallback {
        started: AtomicUsize,
        completed: AtomicUsize,
    }

    impl RunProgressCallback for CountingCallback {
        fn on_run_start(&self, total: usize) {
            self.started.store(total + 1, Ordering::SeqCst);
        }
        fn on_run_complete(&self, _total: usize, rendered: usize) {
            self.completed.store(rendered + 1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn empty_input_completes_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        std::fs::write(&input, ",,,\n,,\n").unwrap();

        let cb = Arc::new(CountingCallback {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });
        let config = RunConfig::builder()
            .base_dir(dir.path())
            .progress_callback(cb.clone())
            .build()
            .unwrap();

        let output = run(&input, &config).await.unwrap();
        assert_eq!(output.stats.total_keys, 0);
        assert_eq!(output.stats.rendered, 0);
        assert!(output.drinks.is_empty());
        // +1 sentinel distinguishes "called with 0" from "never called".
        assert_eq!(cb.started.load(Ordering::SeqCst), 1);
        assert_eq!(cb.completed.load(Ordering::SeqCst), 1);
        // No output directory is created until a document is written.
        assert!(!config.output_path().exists());
    }

    #[tokio::test]
    async fn missing_input_is_fatal() {
        let config = RunConfig::default();
        let err = run("no_such_file.txt", &config).await.unwrap_err();
        assert!(matches!(err, CocktailError::InputFileNotFound { .. }));
    }

    #[tokio::test]
    async fn wrong_extension_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("drinks.pdf");
        std::fs::write(&input, "negroni").unwrap();
        let config = RunConfig::default();
        let err = run(&input, &config).await.unwrap_err();
        assert!(matches!(err, CocktailError::UnsupportedExtension { .. }));
    }

    #[test]
    fn run_sync_propagates_errors() {
        let config = RunConfig::default();
        let err = run_sync("no_such_file.txt", &config).unwrap_err();
        assert!(matches!(err, CocktailError::InputFileNotFound { .. }));
    }

    #[tokio::test]
    async fn unreachable_api_is_fatal_not_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("drinks.txt");
        std::fs::write(&input, "negroni\n").unwrap();

        // A local port nothing listens on, with a short timeout so the
        // test fails fast.
        let config = RunConfig::builder()
            .base_dir(dir.path())
            .api_base_url("http://127.0.0.1:9/api/json/v1/1")
            .timeout_secs(1)
            .build()
            .unwrap();

        let err = run(&input, &config).await.unwrap_err();
        assert!(matches!(err, CocktailError::ApiUnreachable { .. }));
    }
}
