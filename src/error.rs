//! Error types for the cocktail2md library.
//!
//! There is exactly one error enum, [`CocktailError`], and it is always
//! **fatal**: any value of this type aborts the whole run. The other failure
//! mode of the pipeline — a well-formed API response that simply contains no
//! matching drink — is *not* an error. The fetcher reports it as `Ok(None)`
//! and the orchestrator skips that key and moves on.
//!
//! Library code never terminates the process. Every function returns
//! `Result<_, CocktailError>` up to a single top-level handler (the CLI's
//! `main`) that decides exit behaviour, so the library stays testable
//! without intercepting process termination.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the cocktail2md library.
#[derive(Debug, Error)]
pub enum CocktailError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("The file or path '{path}' doesn't exist")]
    InputFileNotFound { path: PathBuf },

    /// The input file has an extension other than `.txt` or `.csv`.
    #[error("Only .txt and .csv files are supported input, got '{path}'")]
    UnsupportedExtension { path: PathBuf },

    /// The input file existed when validated but was gone by the time it
    /// was opened. Reported distinctly from "never existed" — the race is
    /// not resolved, only named.
    #[error("The file or path '{path}' was deleted before it could be read")]
    InputFileVanished { path: PathBuf },

    /// The input file opened but could not be parsed as delimited text.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // ── Lookup errors ─────────────────────────────────────────────────────
    /// The recipe API could not be reached at all (DNS, connect, timeout).
    #[error("The recipe API is not reachable at the moment: {reason}\nTry again later.")]
    ApiUnreachable { url: String, reason: String },

    /// The recipe API answered with a non-success HTTP status.
    #[error("Recipe lookup for '{key}' failed with HTTP {status}\nTry again later.")]
    LookupFailed { key: String, status: u16 },

    /// The response parsed, but a field the pipeline cannot continue
    /// without was missing or had the wrong shape.
    #[error("Unusable API response for '{key}': {detail}")]
    BadApiResponse { key: String, detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The drink image could not be downloaded.
    #[error("Failed to download image '{url}': {reason}\nCheck your internet connection.")]
    ImageDownloadFailed { url: String, reason: String },

    /// The downloaded file could not be decoded or re-encoded as an image.
    #[error("Failed to process image '{path}': {detail}")]
    ImageProcessingFailed { path: PathBuf, detail: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The template failed to load or render.
    #[error("Template error: {detail}")]
    TemplateFailed { detail: String },

    /// An output document already exists and the overwrite policy is
    /// [`OverwritePolicy::Error`](crate::config::OverwritePolicy::Error).
    #[error("Output document already exists: '{path}'\nPass --overwrite overwrite to replace it.")]
    OutputExists { path: PathBuf },

    /// Could not create the output directory or write the document.
    #[error("Failed to write output document '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
