//! Spec and package validation.
//!
//! Catches structural mistakes in spec trees before they reach the
//! completion engine: empty names, malformed option names, duplicates within
//! one scope and variadic arguments that are not last.
//!
//! # Examples
//!
//! ```
//! use spec_complete_core::*;
//!
//! let spec = SubcommandSpec::new("git")
//!     .with_option(OptionSpec::new(&["-v", "--verbose"]));
//! assert!(validate_spec(&spec).is_empty());
//!
//! // Invalid: option name missing its leading dash
//! let bad = SubcommandSpec::new("git").with_option(OptionSpec::new(&["verbose"]));
//! assert!(!validate_spec(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgSpec, LoadSpec, OptionSpec, SpecPackage, SubcommandSpec};

/// Spec/package validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Root command name is empty or whitespace-only.
    #[error("spec command cannot be empty")]
    EmptyCommandName,
    /// Two root specs in the same package share a name.
    #[error("duplicate command in package: {0}")]
    DuplicateCommand(String),
    /// A subcommand at the given path has an empty name.
    #[error("empty subcommand name under: {0}")]
    EmptySubcommandName(String),
    /// Two subcommands in the same scope share a name.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// An option declares no names.
    #[error("option must define at least one name under: {0}")]
    MissingOptionName(String),
    /// Option name does not start with `-` or `+`.
    #[error("invalid option name: {0}")]
    InvalidOptionName(String),
    /// Two options in the same scope share a name.
    #[error("duplicate option in scope: {0}")]
    DuplicateOption(String),
    /// A variadic argument is followed by another argument.
    #[error("variadic argument must be last: {0}")]
    VariadicArgNotLast(String),
    /// `loadSpec` names an empty key.
    #[error("empty loadSpec key at: {0}")]
    EmptyLoadSpecKey(String),
}

/// Validates a full spec package.
///
/// Returns on the first problem found.
///
/// # Examples
///
/// ```
/// use spec_complete_core::*;
///
/// let mut package = SpecPackage::new("1.0.0", "2024-01-01T00:00:00Z");
/// package.specs.push(SubcommandSpec::new("git"));
/// assert!(validate_package(&package).is_empty());
///
/// package.specs.push(SubcommandSpec::new("git"));
/// let errors = validate_package(&package);
/// assert!(matches!(errors[0], ValidationError::DuplicateCommand(_)));
/// ```
pub fn validate_package(package: &SpecPackage) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageVersion);
        return errors;
    }

    let mut seen_commands: HashSet<&str> = HashSet::new();
    for spec in &package.specs {
        let command = spec.primary_name();
        if !seen_commands.insert(command) {
            errors.push(ValidationError::DuplicateCommand(command.to_string()));
            return errors;
        }
        errors.extend(validate_spec(spec));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a root spec and all its descendants.
pub fn validate_spec(spec: &SubcommandSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if spec.name.is_empty() || spec.name.iter().any(|n| n.trim().is_empty()) {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut path = vec![spec.primary_name().to_string()];
    errors.extend(validate_node(spec, &mut path));
    errors
}

fn validate_node(node: &SubcommandSpec, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let scope = path.join(" ");

    if let Some(LoadSpec::Key(key)) = &node.load_spec {
        if key.trim().is_empty() {
            errors.push(ValidationError::EmptyLoadSpecKey(scope));
            return errors;
        }
    }

    errors.extend(validate_options(&node.options, &scope));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_args(&node.args, &scope));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &node.subcommands {
        if sub.name.is_empty() || sub.name.iter().any(|n| n.trim().is_empty()) {
            errors.push(ValidationError::EmptySubcommandName(scope));
            return errors;
        }
        for name in &sub.name {
            if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateSubcommand(format!("{scope} {name}")));
                return errors;
            }
        }

        path.push(sub.primary_name().to_string());
        errors.extend(validate_node(sub, path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[OptionSpec], scope: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for option in options {
        if option.name.is_empty() {
            errors.push(ValidationError::MissingOptionName(scope.to_string()));
            return errors;
        }
        for name in &option.name {
            if name.len() < 2 || !(name.starts_with('-') || name.starts_with('+')) {
                errors.push(ValidationError::InvalidOptionName(name.clone()));
                return errors;
            }
            if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateOption(name.clone()));
                return errors;
            }
        }

        let option_scope = format!("{scope} {}", option.long_name());
        errors.extend(validate_args(&option.args, &option_scope));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_args(args: &[ArgSpec], scope: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let last = args.len().saturating_sub(1);
    if let Some((index, arg)) = args
        .iter()
        .enumerate()
        .find(|(i, a)| a.is_variadic && *i != last)
    {
        let name = arg.name.clone().unwrap_or_else(|| format!("#{index}"));
        errors.push(ValidationError::VariadicArgNotLast(format!("{scope} {name}")));
    }
    errors
}
