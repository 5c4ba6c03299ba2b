//! Core spec tree types and shared spec package primitives.
//!
//! This crate defines the declarative model that describes a CLI for
//! completion:
//!
//! - [`SubcommandSpec`]: a command or subcommand with child subcommands,
//!   options, positional args and an optional deferred [`LoadSpec`].
//! - [`OptionSpec`]: a flag with aliases, args, persistence and exclusions.
//! - [`ArgSpec`]: a positional argument with generators, literal suggestions
//!   and templates.
//! - [`Generator`]: a dynamic suggestion directive (script, custom callback or
//!   template).
//! - [`SpecPackage`]: a versioned bundle of root specs for distribution.
//!
//! Callback seams ([`ScriptFn`], [`PostProcess`], [`CustomGenerator`],
//! [`TemplateFilter`], [`DynamicSpec`]) and the [`ShellExecutor`] trait let
//! specs built in Rust run code at completion time.
//!
//! Validation ([`validate_spec`], [`validate_package`]) catches structural
//! errors, and [`overlay_subcommand`] applies a lazily resolved spec onto
//! its placeholder.
//!
//! # Example
//!
//! ```
//! use spec_complete_core::*;
//!
//! let spec = SubcommandSpec::new("mycli")
//!     .with_option(
//!         OptionSpec::new(&["-v", "--verbose"])
//!             .with_description("Enable verbose output")
//!             .persistent(),
//!     )
//!     .with_subcommand(
//!         SubcommandSpec::new("run")
//!             .with_option(OptionSpec::new(&["--port"]).with_arg(ArgSpec::new("port")))
//!             .with_arg(ArgSpec::new("script").with_template(TemplateKind::Filepaths)),
//!     );
//!
//! assert_eq!(spec.find_subcommand("run").unwrap().primary_name(), "run");
//! assert!(spec.find_option("--verbose").is_some());
//! assert!(validate_spec(&spec).is_empty());
//! ```

mod callback;
mod merge;
mod package;
mod types;
mod validate;

pub use callback::*;
pub use merge::{overlay_subcommand, strip_load_spec};
pub use package::SpecPackage;
pub use types::*;
pub use validate::{ValidationError, validate_package, validate_spec};
