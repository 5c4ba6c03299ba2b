//! Spec database loading with builder pattern and fallback chains.
//!
//! Provides [`SpecDatabase`] for in-memory spec lookup and
//! [`DatabaseBuilder`] for constructing a database from multiple sources with
//! automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use spec_complete_db::SpecDatabase;
//!
//! // Load from a directory tree of JSON spec files
//! let db = SpecDatabase::from_dir("specs/").unwrap();
//! assert!(db.get("git").is_some());
//!
//! // Load from a single SpecPackage JSON bundle
//! let db = SpecDatabase::from_bundle("specs.json").unwrap();
//!
//! // Use the builder for a fallback chain
//! let db = SpecDatabase::builder()
//!     .from_dir("specs/")
//!     .from_bundle("specs.json")
//!     .build()
//!     .unwrap();
//! ```
//!
//! Specs are keyed by their path relative to the directory root without the
//! `.json` extension, so `aws/s3.json` is the `loadSpec` target `"aws/s3"`.
//! Keys containing `/` are never matched as root commands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spec_complete_core::{SpecLocation, SpecPackage, SubcommandSpec};
use spec_complete_engine::{CommandToken, SpecLoadError, SpecLoader};
use tracing::debug;

use crate::error::{DatabaseError, Result};

/// Describes where a [`SpecDatabase`] was loaded from.
#[derive(Debug, Clone)]
pub enum DatabaseSource {
    /// Loaded from a directory tree of individual JSON spec files.
    Directory(PathBuf),
    /// Loaded from a single [`SpecPackage`] JSON file.
    Bundle(PathBuf),
    /// Built in memory.
    Memory,
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<DatabaseSource>),
}

/// In-memory collection of command specs with O(1) lookup by key.
///
/// # Examples
///
/// ```
/// use spec_complete_core::SubcommandSpec;
/// use spec_complete_db::SpecDatabase;
///
/// let mut db = SpecDatabase::new();
/// db.insert("git", SubcommandSpec::new("git"));
/// db.insert("aws/s3", SubcommandSpec::new("s3"));
///
/// assert!(db.contains("aws/s3"));
/// assert_eq!(db.commands().collect::<Vec<_>>(), ["git"]);
/// ```
#[derive(Debug)]
pub struct SpecDatabase {
    specs: HashMap<String, Arc<SubcommandSpec>>,
    source: DatabaseSource,
}

impl SpecDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
            source: DatabaseSource::Memory,
        }
    }

    /// Returns a new [`DatabaseBuilder`] for configuring a fallback chain.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Loads specs from a directory tree of `*.json` files.
    ///
    /// Each file is parsed as a [`SubcommandSpec`] and indexed by its path
    /// relative to `path`, without extension.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Io`] if a directory or file cannot be read,
    /// or [`DatabaseError::InvalidSpec`] if a file is not a command spec.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref();
        let mut files = Vec::new();
        collect_json_files(root, &mut files)?;
        files.sort();

        let mut specs = HashMap::new();
        for file_path in files {
            let spec = read_spec(&file_path)?;
            let key = spec_key(root, &file_path);
            debug!(key = %key, path = %file_path.display(), "Loaded spec");
            specs.insert(key, Arc::new(spec));
        }

        Ok(Self {
            specs,
            source: DatabaseSource::Directory(root.to_path_buf()),
        })
    }

    /// Loads specs from a single [`SpecPackage`] JSON file, keyed by their
    /// primary names.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Io`] if the file cannot be read,
    /// [`DatabaseError::Json`] if parsing fails, or
    /// [`DatabaseError::InvalidSpec`] if a packaged spec has no name.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let package: SpecPackage = serde_json::from_reader(reader)?;

        let mut specs = HashMap::new();
        for spec in package.specs {
            if spec.primary_name().is_empty() {
                return Err(DatabaseError::InvalidSpec {
                    path: path.to_path_buf(),
                    message: "packaged spec has no name".to_string(),
                });
            }
            specs.insert(spec.primary_name().to_string(), Arc::new(spec));
        }

        Ok(Self {
            specs,
            source: DatabaseSource::Bundle(path.to_path_buf()),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Arc<SubcommandSpec>> {
        self.specs.get(key)
    }

    /// Inserts a spec, replacing any existing entry for the same key.
    pub fn insert(&mut self, key: impl Into<String>, spec: SubcommandSpec) {
        self.specs.insert(key.into(), Arc::new(spec));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.specs.contains_key(key)
    }

    /// Returns the number of specs in the database, lazy ones included.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Returns an iterator over root command keys, sorted.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        let mut keys: Vec<&str> = self
            .specs
            .keys()
            .map(String::as_str)
            .filter(|key| is_root_key(key))
            .collect();
        keys.sort_unstable();
        keys.into_iter()
    }

    /// Returns an iterator over every key, lazy specs included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &DatabaseSource {
        &self.source
    }
}

impl Default for SpecDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecLoader for SpecDatabase {
    fn load_spec(&self, tokens: &[CommandToken]) -> std::result::Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        let Some(first) = tokens.first() else {
            return Ok(None);
        };
        if !is_root_key(&first.text) {
            return Ok(None);
        }
        Ok(self.get(&first.text).cloned())
    }

    fn lazy_load_spec(&self, key: &str) -> std::result::Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        Ok(self.get(key).cloned())
    }

    fn lazy_load_spec_location(
        &self,
        location: &SpecLocation,
    ) -> std::result::Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        if let SpecLocation::Local { path: Some(path), name } = location {
            let key = format!("{}/{}", path.trim_end_matches('/'), name);
            if let Some(spec) = self.get(&key) {
                return Ok(Some(spec.clone()));
            }
        }
        Ok(self.get(location.name()).cloned())
    }

    fn spec_names(&self) -> Vec<String> {
        self.commands().map(String::from).collect()
    }
}

fn is_root_key(key: &str) -> bool {
    !key.contains('/')
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

fn read_spec(path: &Path) -> Result<SubcommandSpec> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let spec: SubcommandSpec =
        serde_json::from_reader(reader).map_err(|e| DatabaseError::InvalidSpec {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    if spec.primary_name().is_empty() {
        return Err(DatabaseError::InvalidSpec {
            path: path.to_path_buf(),
            message: "spec has no name".to_string(),
        });
    }
    Ok(spec)
}

/// `root/aws/s3.json` -> `aws/s3`
fn spec_key(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Builder for constructing a [`SpecDatabase`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`DatabaseError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use spec_complete_db::SpecDatabase;
///
/// let db = SpecDatabase::builder()
///     .from_dir("/opt/specs/")
///     .from_bundle("/opt/specs.json")
///     .build()
///     .unwrap();
/// ```
pub struct DatabaseBuilder {
    sources: Vec<DatabaseSource>,
}

impl DatabaseBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a directory tree of JSON spec files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::Directory(path.into()));
        self
    }

    /// Adds a [`SpecPackage`] bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(DatabaseSource::Bundle(path.into()));
        self
    }

    /// Attempts to load specs from configured sources in order.
    ///
    /// Returns the first successfully loaded database. If all sources fail,
    /// returns [`DatabaseError::NoSourcesAvailable`].
    pub fn build(self) -> Result<SpecDatabase> {
        if self.sources.is_empty() {
            return Err(DatabaseError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                DatabaseSource::Directory(path) => SpecDatabase::from_dir(path),
                DatabaseSource::Bundle(path) => SpecDatabase::from_bundle(path),
                DatabaseSource::Memory | DatabaseSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut db) => {
                    db.source = DatabaseSource::Multiple(all_sources);
                    return Ok(db);
                }
                Err(e) => debug!(source = ?source, error = %e, "Spec source failed"),
            }
        }

        Err(DatabaseError::NoSourcesAvailable)
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
