use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use rental_roi_core::benchmarks::{validate_candidates, AlternativeProperty, BenchmarkCatalog};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a JSON or YAML document, chosen by file extension.
pub fn read_document<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    if !is_yaml(&canonical) {
        return read_json(path);
    }
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load and validate a benchmark catalog.
pub fn read_benchmarks(path: &str) -> Result<BenchmarkCatalog, Box<dyn std::error::Error>> {
    let catalog: BenchmarkCatalog = read_document(path)?;
    catalog.validate()?;
    log::debug!("loaded {} benchmarks from {path}", catalog.benchmarks.len());
    Ok(catalog)
}

/// Load and validate alternative-property listings.
pub fn read_candidates(
    path: &str,
) -> Result<Vec<AlternativeProperty>, Box<dyn std::error::Error>> {
    let candidates: Vec<AlternativeProperty> = read_document(path)?;
    validate_candidates(&candidates)?;
    log::debug!("loaded {} candidate listings from {path}", candidates.len());
    Ok(candidates)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
