//! Completion resolution for partially typed command lines.
//!
//! The engine walks a declarative spec tree (see [`spec_complete_core`])
//! alongside the tokens of a command line and builds ranked suggestions for
//! the token being typed:
//!
//! - [`parse_command`] / [`stringify_tokens`]: the tokenizer.
//! - [`Environment`]: host services (filesystem, processes, environment
//!   variables, working directory resolution), with [`HostEnvironment`] as
//!   the `std` implementation.
//! - [`SpecLoader`]: resolves command names to spec trees; lazy `loadSpec`
//!   expansion is memoized in an [`ExpansionCache`].
//! - [`GeneratorRunner`] and [`run_templates`]: dynamic suggestion sources.
//! - [`SuggestionProcessor`]: filtering, ranking and recommendation building.
//! - [`SuggestionRuntime`]: ties everything together.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use spec_complete_core::SubcommandSpec;
//! use spec_complete_engine::*;
//!
//! struct OneSpec(Arc<SubcommandSpec>);
//!
//! impl SpecLoader for OneSpec {
//!     fn load_spec(&self, tokens: &[CommandToken]) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
//!         Ok(tokens.first().filter(|t| self.0.matches(&t.text)).map(|_| self.0.clone()))
//!     }
//!     fn lazy_load_spec(&self, _key: &str) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
//!         Ok(None)
//!     }
//!     fn spec_names(&self) -> Vec<String> {
//!         self.0.name.clone()
//!     }
//! }
//!
//! let git = SubcommandSpec::new("git")
//!     .with_subcommand(SubcommandSpec::new("checkout"))
//!     .with_subcommand(SubcommandSpec::new("cherry-pick"))
//!     .with_subcommand(SubcommandSpec::new("commit"));
//! let runtime = SuggestionRuntime::new(OneSpec(Arc::new(git)), HostEnvironment::new());
//!
//! let blob = runtime.get_suggestions("git ch", Path::new(".")).unwrap();
//! let names: Vec<_> = blob.suggestions.iter().map(|s| s.name.as_str()).collect();
//! assert_eq!(names, ["checkout", "cherry-pick"]);
//! assert_eq!(blob.characters_to_drop, 2);
//! ```

mod config;
mod env;
mod generator;
mod host;
mod loader;
mod runtime;
mod suggestion;
mod template;
mod token;

pub use config::RuntimeConfig;
pub use env::{DirEntry, EntryKind, Environment, ResolvedCwd, ScopedExecutor, Shell};
pub use generator::{GeneratorError, GeneratorRunner};
pub use host::HostEnvironment;
pub use loader::{ExpansionCache, SpecLoadError, SpecLoader};
pub use runtime::SuggestionRuntime;
pub use spec_complete_core::ExecError;
pub use suggestion::{
    DEFAULT_PRIORITY, GENERATOR_PRIORITY, IconCategory, RecommendationInput, Suggestion,
    SuggestionBlob, SuggestionProcessor, option_suggestions, subcommand_suggestions,
    suggestion_suggestions,
};
pub use template::{TEMPLATE_PRIORITY, run_templates};
pub use token::{CommandToken, parse_command, stringify_tokens};
