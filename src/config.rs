//! Configuration for a recipe-rendering run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to thread the same configuration through all pipeline stages and to run
//! the pipeline deterministically in tests — nothing reads the process-wide
//! current directory implicitly; everything is anchored at
//! [`RunConfig::base_dir`].

use crate::error::CocktailError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default base URL of TheCocktailDB JSON API (free tier, key `1`).
pub const DEFAULT_API_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// Configuration for one pipeline run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use cocktail2md::RunConfig;
///
/// let config = RunConfig::builder()
///     .output_dir("recipes")
///     .thumbnail_px(300)
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Directory all relative paths resolve against. Default: `.`.
    ///
    /// An explicit anchor instead of the process current directory, so tests
    /// can point a run at a scratch directory without side effects.
    pub base_dir: PathBuf,

    /// Directory rendered documents are written to, created lazily on the
    /// first write. Relative paths are joined to `base_dir`. Default: `recipes`.
    pub output_dir: PathBuf,

    /// Base URL of the recipe API. Default: [`DEFAULT_API_BASE_URL`].
    ///
    /// Overridable so tests can aim the fetcher at a local stub server.
    pub api_base_url: String,

    /// Timeout applied to every remote call, in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Thumbnail bound: neither image dimension may exceed this many pixels
    /// after retrieval. Shrink-only, never an upscale. Default: 300.
    pub thumbnail_px: u32,

    /// Size of the square image embed written into the document. Default: 80.
    pub embed_px: u32,

    /// Path to a Tera template overriding the built-in one. Default: None.
    pub template_path: Option<PathBuf>,

    /// How output filenames are derived from the recipe name. Default:
    /// [`FilenamePolicy::Verbatim`].
    pub filename_policy: FilenamePolicy,

    /// What to do when an output document already exists. Default:
    /// [`OverwritePolicy::Overwrite`].
    pub overwrite: OverwritePolicy,

    /// Optional per-drink progress events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output_dir: PathBuf::from("recipes"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
            thumbnail_px: 300,
            embed_px: 80,
            template_path: None,
            filename_policy: FilenamePolicy::default(),
            overwrite: OverwritePolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("base_dir", &self.base_dir)
            .field("output_dir", &self.output_dir)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("thumbnail_px", &self.thumbnail_px)
            .field("embed_px", &self.embed_px)
            .field("template_path", &self.template_path)
            .field("filename_policy", &self.filename_policy)
            .field("overwrite", &self.overwrite)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RunProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute-or-anchored location of the output directory.
    pub fn output_path(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.base_dir.join(&self.output_dir)
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn thumbnail_px(mut self, px: u32) -> Self {
        self.config.thumbnail_px = px;
        self
    }

    pub fn embed_px(mut self, px: u32) -> Self {
        self.config.embed_px = px;
        self
    }

    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = Some(path.into());
        self
    }

    pub fn filename_policy(mut self, policy: FilenamePolicy) -> Self {
        self.config.filename_policy = policy;
        self
    }

    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.config.overwrite = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, CocktailError> {
        let c = &self.config;
        if c.thumbnail_px == 0 {
            return Err(CocktailError::InvalidConfig(
                "thumbnail_px must be ≥ 1".into(),
            ));
        }
        if c.embed_px == 0 {
            return Err(CocktailError::InvalidConfig("embed_px must be ≥ 1".into()));
        }
        if c.api_base_url.is_empty() {
            return Err(CocktailError::InvalidConfig(
                "api_base_url must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the output filename is derived from the recipe name.
///
/// Recipe names come from a remote catalogue and can contain characters that
/// are unsafe in paths. Whether that matters depends on where the output
/// lands, so the behaviour is a policy rather than a hard-coded fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenamePolicy {
    /// Use the recipe name verbatim (default). Two recipes with the same
    /// name target the same file.
    #[default]
    Verbatim,
    /// Replace path separators and control characters with `_`.
    Sanitize,
}

impl FilenamePolicy {
    /// Apply the policy to a recipe name, producing the filename stem.
    pub fn apply(&self, name: &str) -> String {
        match self {
            FilenamePolicy::Verbatim => name.to_string(),
            FilenamePolicy::Sanitize => name
                .chars()
                .map(|c| {
                    if c == '/' || c == '\\' || c == ':' || c.is_control() {
                        '_'
                    } else {
                        c
                    }
                })
                .collect(),
        }
    }
}

/// What to do when the target output document already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Replace the existing document silently (default).
    #[default]
    Overwrite,
    /// Leave the existing document in place and move on.
    Skip,
    /// Abort the run.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RunConfig::builder().build().unwrap();
        assert_eq!(config.thumbnail_px, 300);
        assert_eq!(config.embed_px, 80);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.overwrite, OverwritePolicy::Overwrite);
        assert_eq!(config.filename_policy, FilenamePolicy::Verbatim);
    }

    #[test]
    fn zero_thumbnail_px_rejected() {
        let err = RunConfig::builder().thumbnail_px(0).build().unwrap_err();
        assert!(err.to_string().contains("thumbnail_px"));
    }

    #[test]
    fn empty_api_url_rejected() {
        assert!(RunConfig::builder().api_base_url("").build().is_err());
    }

    #[test]
    fn output_path_joins_relative_dirs() {
        let config = RunConfig::builder()
            .base_dir("/srv/runs")
            .output_dir("recipes")
            .build()
            .unwrap();
        assert_eq!(config.output_path(), PathBuf::from("/srv/runs/recipes"));
    }

    #[test]
    fn output_path_keeps_absolute_dirs() {
        let config = RunConfig::builder()
            .base_dir("/srv/runs")
            .output_dir("/var/out")
            .build()
            .unwrap();
        assert_eq!(config.output_path(), PathBuf::from("/var/out"));
    }

    #[test]
    fn sanitize_replaces_unsafe_chars() {
        assert_eq!(FilenamePolicy::Sanitize.apply("A/B:C\\D"), "A_B_C_D");
        assert_eq!(FilenamePolicy::Sanitize.apply("Piña Colada"), "Piña Colada");
    }

    #[test]
    fn verbatim_passes_everything_through() {
        assert_eq!(FilenamePolicy::Verbatim.apply("AT&T/On the Rocks"), "AT&T/On the Rocks");
    }
}
