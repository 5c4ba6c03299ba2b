use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::Shell;

/// Tunables for a [`SuggestionRuntime`](crate::SuggestionRuntime).
///
/// # Examples
///
/// ```
/// use spec_complete_engine::{RuntimeConfig, Shell};
///
/// let config = RuntimeConfig::default();
/// assert_eq!(config.suggestion_limit, 100);
/// assert_eq!(config.generator_timeout_ms, 5000);
/// assert_eq!(config.shell, Shell::Bash);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum number of suggestions returned per request.
    pub suggestion_limit: usize,
    /// Timeout for generator scripts that don't declare their own.
    pub generator_timeout_ms: u64,
    /// Maximum subcommand and command-handoff nesting per request.
    pub max_depth: usize,
    pub shell: Shell,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: 100,
            generator_timeout_ms: 5000,
            max_depth: 256,
            shell: Shell::Bash,
        }
    }
}

impl RuntimeConfig {
    pub fn generator_timeout(&self) -> Duration {
        Duration::from_millis(self.generator_timeout_ms)
    }
}
