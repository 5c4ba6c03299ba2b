//! Completion configuration file.
//!
//! Defines the YAML-serializable configuration naming where specs are loaded
//! from and how the runtime behaves.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! specs:
//!   dirs:
//!     - ~/.local/share/spec-complete/specs
//!   bundles:
//!     - /usr/share/spec-complete/specs.json
//! runtime:
//!   suggestion_limit: 50
//!   generator_timeout_ms: 2000
//!   shell: zsh
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spec_complete_engine::RuntimeConfig;

use crate::error::Result;
use crate::loader::{DatabaseBuilder, SpecDatabase};

/// Spec sources, tried in order: directories first, then bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSources {
    pub dirs: Vec<PathBuf>,
    pub bundles: Vec<PathBuf>,
}

impl SpecSources {
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.bundles.is_empty()
    }

    /// Builder over every source, in fallback order.
    pub fn builder(&self) -> DatabaseBuilder {
        let builder = self
            .dirs
            .iter()
            .fold(SpecDatabase::builder(), |b, dir| b.from_dir(dir));
        self.bundles.iter().fold(builder, |b, bundle| b.from_bundle(bundle))
    }
}

/// Top-level completion configuration.
///
/// # Examples
///
/// ```no_run
/// use spec_complete_db::CompletionConfig;
///
/// let config = CompletionConfig::load("spec-complete.yml").unwrap();
/// let db = config.database().unwrap();
/// println!("{} specs, limit {}", db.len(), config.runtime.suggestion_limit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub specs: SpecSources,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            specs: SpecSources::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl CompletionConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::DatabaseError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::DatabaseError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::DatabaseError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::DatabaseError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads the spec database from the configured sources.
    ///
    /// # Errors
    ///
    /// Returns [`NoSourcesAvailable`](crate::DatabaseError::NoSourcesAvailable)
    /// when no source is configured or none of them loads.
    pub fn database(&self) -> Result<SpecDatabase> {
        self.specs.builder().build()
    }
}
