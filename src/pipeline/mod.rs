//! Pipeline stages for turning drink names into recipe documents.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets one stage
//! change (say, a different templating engine) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ fetch ──▶ image ──▶ render
//! (file)  (lookup) (thumbnail) (document)
//! ```
//!
//! 1. [`input`]  — validate the input file and flatten it into canonical keys
//! 2. [`fetch`]  — one catalogue lookup per key, normalised into a
//!    [`fetch::RecipeRecord`] (or "not found")
//! 3. [`image`]  — download the drink image into run-scoped temp storage and
//!    shrink it in place; decode/resize runs in `spawn_blocking`
//! 4. [`render`] — fill the document template and write one file per drink

pub mod fetch;
pub mod image;
pub mod input;
pub mod render;
