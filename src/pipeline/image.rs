//! Image retrieval: download a drink image and thumbnail it in place.
//!
//! ## Why a run-scoped temp directory?
//!
//! The document renderer needs a file-system path to reference, but the
//! images are only useful for the lifetime of one run. Holding them in a
//! [`TempStore`] backed by [`tempfile::TempDir`] means every image is
//! deleted when the store drops — on success, on a fatal error, even on a
//! panic. Filenames inside the store are 32 random hex characters; the
//! collision probability of 16 random bytes is treated as negligible and
//! not guarded by an existence check.

use crate::config::RunConfig;
use crate::error::CocktailError;
use image::imageops::FilterType;
use image::DynamicImage;
use once_cell::sync::OnceCell;
use rand::Rng;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Run-scoped storage for downloaded images.
///
/// The underlying directory is created lazily on the first write and removed
/// wholesale when the store is dropped, whichever way the run ends.
#[derive(Debug, Default)]
pub struct TempStore {
    dir: OnceCell<TempDir>,
}

impl TempStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the temp directory, creating it on first use.
    pub fn dir(&self) -> Result<&Path, CocktailError> {
        self.dir
            .get_or_try_init(|| {
                tempfile::Builder::new()
                    .prefix("cocktail2md-")
                    .tempdir()
                    .map_err(|e| CocktailError::Internal(format!("Failed to create temp dir: {e}")))
            })
            .map(|d| d.path())
    }

    /// Reserve a fresh, uniquely named `.jpg` path inside the store.
    pub fn new_image_path(&self) -> Result<PathBuf, CocktailError> {
        Ok(self.dir()?.join(format!("{}.jpg", random_token())))
    }
}

/// 32 lowercase hex characters from 16 random bytes.
fn random_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Download the image at `url` into the temp store and shrink it in place
/// to the configured thumbnail bound. Returns the local file path.
///
/// Deleting the file is not this function's job — the whole store is
/// removed at once when the run ends.
pub async fn retrieve(
    client: &reqwest::Client,
    url: &str,
    temp: &TempStore,
    config: &RunConfig,
) -> Result<PathBuf, CocktailError> {
    let path = temp.new_image_path()?;
    download_to(client, url, &path).await?;

    // Decode + resize is CPU-bound; keep it off the async executor.
    let max_px = config.thumbnail_px;
    let thumb_path = path.clone();
    tokio::task::spawn_blocking(move || shrink_in_place(&thumb_path, max_px))
        .await
        .map_err(|e| CocktailError::Internal(format!("thumbnail task panicked: {e}")))??;

    debug!("Retrieved image {} → {}", url, path.display());
    Ok(path)
}

/// Stream the response body to `path`.
async fn download_to(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<(), CocktailError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CocktailError::ImageDownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(CocktailError::ImageDownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let mut file =
        tokio::fs::File::create(path)
            .await
            .map_err(|e| CocktailError::ImageDownloadFailed {
                url: url.to_string(),
                reason: format!("cannot create {}: {e}", path.display()),
            })?;

    while let Some(chunk) =
        response
            .chunk()
            .await
            .map_err(|e| CocktailError::ImageDownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| CocktailError::ImageDownloadFailed {
                url: url.to_string(),
                reason: format!("cannot write {}: {e}", path.display()),
            })?;
    }

    file.flush()
        .await
        .map_err(|e| CocktailError::ImageDownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    Ok(())
}

/// Decode the file at `path` and, if either dimension exceeds `max_px`,
/// replace it with an aspect-preserving Lanczos3 downscale saved as JPEG.
///
/// Shrink-only: images already within bounds are left untouched on disk.
pub fn shrink_in_place(path: &Path, max_px: u32) -> Result<(), CocktailError> {
    let img = image::open(path).map_err(|e| CocktailError::ImageProcessingFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    if img.width() <= max_px && img.height() <= max_px {
        debug!(
            "Image {} is {}×{}, within {}px bound — not resized",
            path.display(),
            img.width(),
            img.height(),
            max_px
        );
        return Ok(());
    }

    let thumb = img.resize(max_px, max_px, FilterType::Lanczos3);
    // JPEG has no alpha channel; flatten before re-encoding.
    DynamicImage::ImageRgb8(thumb.to_rgb8())
        .save(path)
        .map_err(|e| CocktailError::ImageProcessingFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    debug!(
        "Thumbnailed {} to {}×{}",
        path.display(),
        thumb.width(),
        thumb.height()
    );
    Ok(())
}
