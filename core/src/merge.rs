//! Lazy-expansion overlay.
//!
//! A subcommand with a `loadSpec` is a placeholder: its real contents come
//! from another spec. [`overlay_subcommand`] combines the placeholder with
//! the resolved node without touching either input.
//!
//! # Example
//!
//! ```
//! use spec_complete_core::*;
//!
//! let placeholder = SubcommandSpec::new("s3")
//!     .with_description("Amazon S3")
//!     .with_load_spec(LoadSpec::Key("aws/s3".into()));
//! let resolved = SubcommandSpec::new("aws-s3")
//!     .with_subcommand(SubcommandSpec::new("ls"))
//!     .with_subcommand(SubcommandSpec::new("cp"));
//!
//! let expanded = overlay_subcommand(&placeholder, &resolved);
//! assert_eq!(expanded.name, vec!["s3"]);
//! assert_eq!(expanded.description.as_deref(), Some("Amazon S3"));
//! assert_eq!(expanded.subcommands.len(), 2);
//! assert!(expanded.load_spec.is_none());
//! ```

use crate::{FilterStrategy, SubcommandSpec};

/// Overlays `resolved` onto `placeholder`.
///
/// Non-empty lists and `Some` values from `resolved` replace the
/// placeholder's; a non-default filter strategy wins as well. The
/// placeholder keeps its names and `loadSpec` is cleared.
pub fn overlay_subcommand(placeholder: &SubcommandSpec, resolved: &SubcommandSpec) -> SubcommandSpec {
    let mut merged = placeholder.clone();
    merged.load_spec = None;

    if !resolved.subcommands.is_empty() {
        merged.subcommands = resolved.subcommands.clone();
    }
    if !resolved.options.is_empty() {
        merged.options = resolved.options.clone();
    }
    if !resolved.args.is_empty() {
        merged.args = resolved.args.clone();
    }
    if resolved.filter_strategy != FilterStrategy::Default {
        merged.filter_strategy = resolved.filter_strategy;
    }

    merged.description = resolved.description.clone().or(merged.description);
    merged.priority = resolved.priority.or(merged.priority);
    merged.insert_value = resolved.insert_value.clone().or(merged.insert_value);
    merged.icon = resolved.icon.clone().or(merged.icon);

    merged
}

/// Returns the placeholder with `loadSpec` cleared; used when expansion fails.
pub fn strip_load_spec(placeholder: &SubcommandSpec) -> SubcommandSpec {
    let mut stripped = placeholder.clone();
    stripped.load_spec = None;
    stripped
}
