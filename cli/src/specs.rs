//! Spec file collection, validation and bundling.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use spec_complete_core::{SpecPackage, SubcommandSpec, validate_package, validate_spec};

/// Expands files and directories (recursively) into a sorted list of spec
/// JSON files.
pub fn collect_spec_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    if inputs.is_empty() {
        return Err("No spec paths were provided".to_string());
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            collect_dir(input, &mut paths)?;
            continue;
        }

        if input.is_file() {
            if input.extension() != Some(OsStr::new("json")) {
                return Err(format!("Spec file '{}' must end in .json", input.display()));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(format!("Spec path '{}' does not exist", input.display()));
    }

    if paths.is_empty() {
        return Err("No spec JSON files found in provided paths".to_string());
    }

    Ok(paths.into_iter().collect())
}

fn collect_dir(dir: &Path, paths: &mut BTreeSet<PathBuf>) -> Result<(), String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read '{}': {e}", dir.display()))?;
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to read '{}': {e}", dir.display()))?
            .path();
        if path.is_dir() {
            collect_dir(&path, paths)?;
        } else if path.extension() == Some(OsStr::new("json")) {
            paths.insert(path);
        }
    }
    Ok(())
}

/// Parses every file as a spec and rejects the first invalid one.
pub fn load_and_validate_specs(paths: &[PathBuf]) -> Result<Vec<SubcommandSpec>, String> {
    let mut specs = Vec::with_capacity(paths.len());

    for path in paths {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
        let spec: SubcommandSpec = serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse '{}': {e}", path.display()))?;

        let errors = validate_spec(&spec);
        if let Some(first) = errors.first() {
            return Err(format!(
                "Spec validation failed for '{}': {first}",
                path.display()
            ));
        }

        specs.push(spec);
    }

    Ok(specs)
}

/// Builds a validated package from spec files, stamped with the current
/// time and a content hash.
pub fn bundle_spec_files(
    paths: &[PathBuf],
    version: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<SpecPackage, String> {
    let specs = load_and_validate_specs(paths)?;

    let mut package = SpecPackage::new(version, Utc::now().to_rfc3339());
    package.name = name;
    package.description = description;
    package.bundle_hash = Some(bundle_hash(&specs)?);
    package.specs = specs;

    let errors = validate_package(&package);
    if let Some(first) = errors.first() {
        return Err(format!("Spec package validation failed: {first}"));
    }

    Ok(package)
}

/// Hex sha256 of the serialized specs.
pub fn bundle_hash(specs: &[SubcommandSpec]) -> Result<String, String> {
    let bytes =
        serde_json::to_vec(specs).map_err(|e| format!("Failed to serialize specs: {e}"))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
