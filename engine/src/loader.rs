//! Spec loader port and the lazy-expansion cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use spec_complete_core::{
    LoadSpec, LoadedSpec, ShellExecutor, SpecLocation, SubcommandSpec, overlay_subcommand,
    strip_load_spec,
};
use thiserror::Error;
use tracing::debug;

use crate::token::CommandToken;

/// Failures while resolving a spec.
#[derive(Debug, Error)]
pub enum SpecLoadError {
    /// The spec source could not be read.
    #[error("spec '{key}' is unavailable: {message}")]
    Unavailable { key: String, message: String },
    /// The spec was read but does not describe a command.
    #[error("spec '{key}' is invalid: {message}")]
    Invalid { key: String, message: String },
    /// A dynamic `loadSpec` callback failed.
    #[error("dynamic loadSpec for '{token}' failed: {message}")]
    Dynamic { token: String, message: String },
}

/// Resolves command names to spec trees.
pub trait SpecLoader: Send + Sync {
    /// Root spec for the command named by the first token.
    fn load_spec(&self, tokens: &[CommandToken]) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError>;

    /// Spec stored under `key` (`"aws/s3"`).
    fn lazy_load_spec(&self, key: &str) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError>;

    /// Spec at `location`. Defaults to a key lookup by name.
    fn lazy_load_spec_location(
        &self,
        location: &SpecLocation,
    ) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        self.lazy_load_spec(location.name())
    }

    /// Names of all root commands.
    fn spec_names(&self) -> Vec<String>;
}

type ExpansionKey = (String, String);

/// Memoized `loadSpec` expansions, keyed by parent path and child name.
///
/// The cache lives for the lifetime of the runtime. Only successful
/// expansions are stored, and the first one written for a key wins.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    entries: RwLock<HashMap<ExpansionKey, Arc<SubcommandSpec>>>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parent_path: &str, child: &str) -> Option<Arc<SubcommandSpec>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(parent_path.to_string(), child.to_string()))
            .cloned()
    }

    /// Stores `spec` unless the key is taken; returns whichever is cached.
    pub fn insert(&self, parent_path: &str, child: &str, spec: Arc<SubcommandSpec>) -> Arc<SubcommandSpec> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry((parent_path.to_string(), child.to_string()))
            .or_insert(spec)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Returns `placeholder` with its `loadSpec` applied.
    ///
    /// Nodes without `loadSpec` are returned as is. When resolution fails the
    /// placeholder comes back with `loadSpec` cleared and nothing is cached.
    pub fn expand(
        &self,
        loader: &dyn SpecLoader,
        parent_path: &str,
        placeholder: &Arc<SubcommandSpec>,
        token: &str,
        executor: &dyn ShellExecutor,
    ) -> Arc<SubcommandSpec> {
        let Some(load_spec) = &placeholder.load_spec else {
            return Arc::clone(placeholder);
        };
        let child = placeholder.primary_name();
        if let Some(cached) = self.get(parent_path, child) {
            return cached;
        }

        match resolve_load_spec(loader, load_spec, token, executor) {
            Ok(Some(resolved)) => {
                let expanded = Arc::new(overlay_subcommand(placeholder, &resolved));
                self.insert(parent_path, child, expanded)
            }
            Ok(None) => {
                debug!(parent = parent_path, subcommand = child, "loadSpec resolved to nothing");
                Arc::new(strip_load_spec(placeholder))
            }
            Err(e) => {
                debug!(parent = parent_path, subcommand = child, error = %e, "loadSpec failed");
                Arc::new(strip_load_spec(placeholder))
            }
        }
    }
}

fn resolve_load_spec(
    loader: &dyn SpecLoader,
    load_spec: &LoadSpec,
    token: &str,
    executor: &dyn ShellExecutor,
) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
    match load_spec {
        LoadSpec::Key(key) => loader.lazy_load_spec(key),
        LoadSpec::Inline(sub) => Ok(Some(Arc::new(sub.as_ref().clone()))),
        LoadSpec::Dynamic(resolver) => {
            let loaded = resolver
                .call(token, executor)
                .map_err(|e| SpecLoadError::Dynamic {
                    token: token.to_string(),
                    message: e.to_string(),
                })?;
            match loaded {
                LoadedSpec::Subcommand(sub) => Ok(Some(Arc::new(sub))),
                LoadedSpec::Location(location) => loader.lazy_load_spec_location(&location),
                LoadedSpec::Locations(locations) => {
                    for location in &locations {
                        if let Some(spec) = loader.lazy_load_spec_location(location)? {
                            if spec.matches(token) {
                                return Ok(Some(spec));
                            }
                        }
                    }
                    Ok(None)
                }
            }
        }
    }
}
