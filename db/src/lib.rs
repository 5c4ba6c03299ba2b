//! Spec database loading and configuration for spec-complete.
//!
//! This crate loads command specs from directories and [`SpecPackage`]
//! bundles, serves them to the engine through the
//! [`SpecLoader`](spec_complete_engine::SpecLoader) port, and reads the YAML
//! configuration file.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use spec_complete_db::{CompletionConfig, SpecDatabase};
//! use spec_complete_engine::{HostEnvironment, SuggestionRuntime};
//!
//! // Load specs from a directory, falling back to a bundle
//! let db = SpecDatabase::builder()
//!     .from_dir("specs/")
//!     .from_bundle("specs.json")
//!     .build()
//!     .unwrap();
//!
//! let runtime = SuggestionRuntime::new(db, HostEnvironment::new())
//!     .with_config(CompletionConfig::default().runtime);
//! if let Some(blob) = runtime.get_suggestions("git ch", Path::new(".")) {
//!     println!("{} suggestions", blob.suggestions.len());
//! }
//! ```
//!
//! [`SpecPackage`]: spec_complete_core::SpecPackage

mod config;
mod error;
mod loader;

pub use config::{CompletionConfig, SpecSources};
pub use error::{DatabaseError, Result};
pub use loader::{DatabaseBuilder, DatabaseSource, SpecDatabase};
