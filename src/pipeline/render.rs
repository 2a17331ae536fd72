//! Document rendering: fill the recipe template and write one document
//! per found drink.
//!
//! The template is Tera. A built-in default ships inside the binary via
//! `include_str!` so a bare `cocktail2md drinks.txt` works with no support
//! files; [`crate::config::RunConfig::template_path`] swaps in a user
//! template with the same context contract:
//!
//! | Key            | Value                                             |
//! |----------------|---------------------------------------------------|
//! | `title`        | recipe name                                       |
//! | `image`        | local thumbnail path                              |
//! | `embed_px`     | square embed size (default 80)                    |
//! | `glass`        | serving glass                                     |
//! | `desc`         | preparation instructions                          |
//! | `tbl_contents` | ordered `{measure, ingredient}` rows              |

use crate::config::{OverwritePolicy, RunConfig};
use crate::error::CocktailError;
use crate::pipeline::fetch::RecipeRecord;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::path::PathBuf;
use tera::{Context, Tera};
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "recipe.md";

static DEFAULT_TEMPLATE: &str = include_str!("../../templates/recipe.md.tera");

static DEFAULT_TERA: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)
        .expect("built-in template is valid");
    tera
});

/// One row of the ingredient table. A null measure renders as an empty cell.
#[derive(Serialize)]
struct TableRow<'a> {
    measure: &'a str,
    ingredient: &'a str,
}

/// Render one recipe document into the output directory.
///
/// The output directory is created lazily on the first write. The filename
/// is derived from the recipe name per the configured
/// [`FilenamePolicy`](crate::config::FilenamePolicy); an existing document
/// at that path is handled per the configured [`OverwritePolicy`]. Returns
/// the document path (also for `Skip`, where nothing was written).
pub async fn render_document(
    record: &RecipeRecord,
    config: &RunConfig,
) -> Result<PathBuf, CocktailError> {
    let out_dir = config.output_path();
    tokio::fs::create_dir_all(&out_dir)
        .await
        .map_err(|e| CocktailError::OutputWriteFailed {
            path: out_dir.clone(),
            source: e,
        })?;

    let filename = format!("{}.md", config.filename_policy.apply(&record.name));
    let path = out_dir.join(filename);

    if path.exists() {
        match config.overwrite {
            OverwritePolicy::Overwrite => {}
            OverwritePolicy::Skip => {
                info!("'{}' already exists — skipping", path.display());
                return Ok(path);
            }
            OverwritePolicy::Error => {
                return Err(CocktailError::OutputExists { path });
            }
        }
    }

    let rendered = render_template(record, config)?;

    tokio::fs::write(&path, rendered)
        .await
        .map_err(|e| CocktailError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!("Wrote document {}", path.display());
    Ok(path)
}

/// Fill the template with the record's context.
fn render_template(record: &RecipeRecord, config: &RunConfig) -> Result<String, CocktailError> {
    let context = build_context(record, config);

    let result = match &config.template_path {
        Some(path) => {
            let mut tera = Tera::default();
            tera.add_template_file(path, Some(TEMPLATE_NAME))
                .map_err(|e| CocktailError::TemplateFailed {
                    detail: format!("failed to load '{}': {e}", path.display()),
                })?;
            tera.render(TEMPLATE_NAME, &context)
        }
        None => DEFAULT_TERA.render(TEMPLATE_NAME, &context),
    };

    result.map_err(|e| CocktailError::TemplateFailed {
        detail: e.to_string(),
    })
}

fn build_context(record: &RecipeRecord, config: &RunConfig) -> Context {
    let rows: Vec<TableRow<'_>> = record
        .ingredients
        .iter()
        .map(|entry| TableRow {
            measure: entry.measure.as_deref().unwrap_or(""),
            ingredient: &entry.ingredient,
        })
        .collect();

    let image = record
        .image
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("title", &record.name);
    context.insert("image", &image);
    context.insert("embed_px", &config.embed_px);
    context.insert("glass", &record.glass);
    context.insert("desc", &record.instructions);
    context.insert("tbl_contents", &rows);
    context
}
