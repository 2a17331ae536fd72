//! Input collection: validate the input file and flatten it into canonical keys.
//!
//! The input is comma-delimited text of any shape — any number of rows, any
//! number of cells per row. Every non-empty cell is one candidate drink name,
//! collected in row-major, left-to-right, top-to-bottom order. Each cell is
//! normalised into a canonical query key: trimmed, lowercased, internal
//! spaces replaced with underscores. Non-ASCII characters pass through
//! untouched apart from Unicode case-folding.
//!
//! Existence and extension are checked up front by [`validate_input_path`];
//! [`collect`] still maps a not-found error from the open to a *distinct*
//! variant, because the file can vanish between the check and the open. The
//! race is not resolved, only reported honestly.

use crate::error::CocktailError;
use std::path::Path;
use tracing::debug;

/// The reserved key that asks the catalogue for an arbitrary drink instead
/// of searching by name.
pub const RANDOM_KEY: &str = "random";

/// Validate that the input path exists and carries a supported extension.
///
/// Accepted extensions are `.txt` and `.csv`, matched exactly (no case
/// folding). Argument-count validation is the CLI parser's job; this covers
/// everything else the binary must reject before a run starts.
pub fn validate_input_path(path: &Path) -> Result<(), CocktailError> {
    if !path.exists() {
        return Err(CocktailError::InputFileNotFound {
            path: path.to_path_buf(),
        });
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") | Some("csv") => Ok(()),
        _ => Err(CocktailError::UnsupportedExtension {
            path: path.to_path_buf(),
        }),
    }
}

/// Collect all drink names from the input file as canonical keys, in order.
///
/// Empty cells (after trimming) are dropped. A leading UTF-8 BOM is stripped
/// so files exported by spreadsheet tools behave the same as plain ones.
pub fn collect(path: &Path) -> Result<Vec<String>, CocktailError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| open_error(path, e))?;

    let mut keys = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CocktailError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        for cell in record.iter() {
            let cell = cell.trim_start_matches('\u{feff}').trim();
            if !cell.is_empty() {
                keys.push(canonical_key(cell));
            }
        }
    }

    debug!("Collected {} keys from {}", keys.len(), path.display());
    Ok(keys)
}

/// Normalise one non-empty, already-trimmed cell into a canonical key.
fn canonical_key(cell: &str) -> String {
    cell.to_lowercase().replace(' ', "_")
}

/// Map a CSV open error, distinguishing the vanished-file race from other
/// read failures.
fn open_error(path: &Path, e: csv::Error) -> CocktailError {
    if let csv::ErrorKind::Io(io) = e.kind() {
        if io.kind() == std::io::ErrorKind::NotFound {
            return CocktailError::InputFileVanished {
                path: path.to_path_buf(),
            };
        }
    }
    CocktailError::InputReadFailed {
        path: path.to_path_buf(),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn validate_accepts_txt_and_csv() {
        assert!(validate_input_path(&fixture("diagonal.txt")).is_ok());
        assert!(validate_input_path(&fixture("row.csv")).is_ok());
    }

    #[test]
    fn validate_rejects_missing_path() {
        let err = validate_input_path(Path::new("file_that_doesnt_exist.txt")).unwrap_err();
        assert!(matches!(err, CocktailError::InputFileNotFound { .. }));
    }

    #[test]
    fn validate_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a_pdf.pdf");
        fs::write(&pdf, b"%PDF").unwrap();
        let err = validate_input_path(&pdf).unwrap_err();
        assert!(matches!(err, CocktailError::UnsupportedExtension { .. }));
    }

    #[test]
    fn collect_diagonal_grid_in_row_major_order() {
        let keys = collect(&fixture("diagonal.txt")).unwrap();
        assert_eq!(
            keys,
            vec![
                "gin_tonic",
                "gin_fizz",
                "negroni",
                "planter’s_punch",
                "rändom"
            ]
        );
    }

    #[test]
    fn collect_single_row() {
        let keys = collect(&fixture("row.csv")).unwrap();
        assert_eq!(keys, vec!["random", "gin_tonic"]);
    }

    #[test]
    fn collect_never_yields_empty_or_spaced_keys() {
        for file in ["diagonal.txt", "row.csv"] {
            for key in collect(&fixture(file)).unwrap() {
                assert!(!key.is_empty());
                assert!(!key.contains(' '), "key {key:?} has spaces");
                assert_eq!(key, key.to_lowercase());
            }
        }
    }

    #[test]
    fn collect_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}Gin Tonic,  Negroni  \n").unwrap();
        assert_eq!(collect(&path).unwrap(), vec!["gin_tonic", "negroni"]);
    }

    #[test]
    fn collect_reports_vanished_file_distinctly() {
        let err = collect(Path::new("deleted_between_check_and_open.txt")).unwrap_err();
        assert!(matches!(err, CocktailError::InputFileVanished { .. }));
    }

    #[test]
    fn canonical_key_normalises() {
        assert_eq!(canonical_key("Gin Tonic"), "gin_tonic");
        assert_eq!(canonical_key("RÄNDOM"), "rändom");
        assert_eq!(canonical_key("planter’s Punch"), "planter’s_punch");
    }
}
