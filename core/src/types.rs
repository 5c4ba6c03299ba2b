//! Spec tree type definitions.
//!
//! This module defines the declarative data model used to describe a CLI for
//! completion: subcommands, options, positional arguments, dynamic generators
//! and built-in templates. The JSON shape follows the widely used Fig-style
//! completion spec corpus (camelCase keys, `name` as string or array), so
//! existing spec files deserialize directly with [`serde`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::callback::{CustomGenerator, DynamicSpec, PostProcess, ScriptFn, TemplateFilter};

/// Version of the spec package contract (semver).
pub const SPEC_CONTRACT_VERSION: &str = "1.0.0";

/// How candidates are matched against the partially typed token.
///
/// # Examples
///
/// ```
/// use spec_complete_core::FilterStrategy;
///
/// assert_eq!(FilterStrategy::default(), FilterStrategy::Default);
/// let parsed: FilterStrategy = serde_json::from_str("\"fuzzy\"").unwrap();
/// assert_eq!(parsed, FilterStrategy::Fuzzy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterStrategy {
    /// Case-insensitive substring match anywhere in a name.
    Fuzzy,
    /// Case-insensitive prefix match.
    Prefix,
    /// Same as [`Prefix`](Self::Prefix).
    #[default]
    Default,
}

/// Kind of spec node or generated entry a suggestion stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Subcommand,
    Option,
    File,
    Folder,
    Arg,
    Mixin,
    Shortcut,
    Special,
}

impl SuggestionKind {
    /// Returns `true` for filesystem entries.
    pub fn is_pathy(self) -> bool {
        matches!(self, Self::File | Self::Folder)
    }
}

/// Built-in template kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Every file and directory in the working directory.
    Filepaths,
    /// Directories in the working directory.
    Folders,
    /// Reserved; produces nothing.
    History,
    /// Reserved; produces nothing.
    Help,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filepaths => "filepaths",
            Self::Folders => "folders",
            Self::History => "history",
            Self::Help => "help",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal suggestion as written in a spec or returned by a generator.
///
/// In spec JSON a literal may be a bare string or an object; both
/// deserialize into this type when they appear in an argument's
/// `suggestions` list.
///
/// # Examples
///
/// ```
/// use spec_complete_core::{ArgSpec, SpecSuggestion, SuggestionKind};
///
/// let arg: ArgSpec = serde_json::from_str(
///     r#"{"suggestions": ["json", {"name": ["yaml", "yml"], "priority": 80}]}"#,
/// ).unwrap();
/// assert_eq!(arg.suggestions[0].name, vec!["json"]);
/// assert_eq!(arg.suggestions[1].name, vec!["yaml", "yml"]);
/// assert_eq!(arg.suggestions[1].priority, Some(80));
///
/// let file = SpecSuggestion::named("README.md").with_kind(SuggestionKind::File);
/// assert!(file.kind.unwrap().is_pathy());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSuggestion {
    #[serde(default, deserialize_with = "one_or_many")]
    pub name: Vec<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<SuggestionKind>,
    pub priority: Option<i32>,
    pub insert_value: Option<String>,
}

impl SpecSuggestion {
    /// Creates a suggestion with a single name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: vec![name.into()],
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_kind(mut self, kind: SuggestionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_insert_value(mut self, value: &str) -> Self {
        self.insert_value = Some(value.to_string());
        self
    }
}

/// A suggestion produced by a template, tagged with the template kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSuggestion {
    #[serde(flatten)]
    pub suggestion: SpecSuggestion,
    pub template: TemplateKind,
}

/// Where a generator's script comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Script {
    /// A shell snippet, run through `bash -c`.
    Shell(String),
    /// An argv run directly.
    Argv(Vec<String>),
    /// An argv computed from the tokens typed so far.
    #[serde(skip)]
    Dynamic(ScriptFn),
}

/// Dynamic suggestion directive attached to an argument.
///
/// # Examples
///
/// ```
/// use spec_complete_core::{Generator, Script, TemplateKind};
///
/// let generator: Generator = serde_json::from_str(
///     r#"{"script": ["git", "branch", "--format=%(refname:short)"], "splitOn": "\n"}"#,
/// ).unwrap();
/// assert!(matches!(generator.script, Some(Script::Argv(_))));
/// assert_eq!(generator.split_on.as_deref(), Some("\n"));
///
/// let templated = Generator::template(TemplateKind::Folders);
/// assert_eq!(templated.template, vec![TemplateKind::Folders]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub script: Option<Script>,
    /// Script timeout in milliseconds.
    pub script_timeout: Option<u64>,
    pub split_on: Option<String>,
    #[serde(skip)]
    pub post_process: Option<PostProcess>,
    #[serde(skip)]
    pub custom: Option<CustomGenerator>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub template: Vec<TemplateKind>,
    #[serde(skip)]
    pub filter_template_suggestions: Option<TemplateFilter>,
}

impl Generator {
    /// Generator that runs `script` through the shell and splits stdout.
    pub fn script(script: &str, split_on: &str) -> Self {
        Self {
            script: Some(Script::Shell(script.to_string())),
            split_on: Some(split_on.to_string()),
            ..Default::default()
        }
    }

    /// Generator backed by a template.
    pub fn template(kind: TemplateKind) -> Self {
        Self {
            template: vec![kind],
            ..Default::default()
        }
    }

    /// Generator backed by a custom callback.
    pub fn custom(custom: CustomGenerator) -> Self {
        Self {
            custom: Some(custom),
            ..Default::default()
        }
    }

    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = Some(post_process);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.script_timeout = Some(timeout_ms);
        self
    }

    pub fn with_template_filter(mut self, filter: TemplateFilter) -> Self {
        self.filter_template_suggestions = Some(filter);
        self
    }
}

/// Positional argument of a subcommand or option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_variadic: bool,
    /// The argument is itself a command line (`sudo <cmd>`).
    #[serde(default)]
    pub is_command: bool,
    #[serde(default, deserialize_with = "one_or_many")]
    pub generators: Vec<Generator>,
    #[serde(default, deserialize_with = "literal_suggestions")]
    pub suggestions: Vec<SpecSuggestion>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub template: Vec<TemplateKind>,
    #[serde(default)]
    pub filter_strategy: FilterStrategy,
}

impl ArgSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    pub fn command(mut self) -> Self {
        self.is_command = true;
        self
    }

    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn with_suggestions(mut self, names: &[&str]) -> Self {
        self.suggestions
            .extend(names.iter().map(|n| SpecSuggestion::named(*n)));
        self
    }

    pub fn with_suggestion(mut self, suggestion: SpecSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_template(mut self, kind: TemplateKind) -> Self {
        self.template.push(kind);
        self
    }

    pub fn with_filter_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.filter_strategy = strategy;
        self
    }
}

/// A flag or option (`-v`, `--output`).
///
/// # Examples
///
/// ```
/// use spec_complete_core::{ArgSpec, OptionSpec};
///
/// let verbose = OptionSpec::new(&["-v", "--verbose"]).persistent();
/// assert!(verbose.matches("-v"));
/// assert!(verbose.matches("--verbose"));
/// assert!(!verbose.matches("-x"));
/// assert_eq!(verbose.long_name(), "--verbose");
///
/// let output = OptionSpec::new(&["-o"]).with_arg(ArgSpec::new("file"));
/// assert!(output.takes_args());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSpec {
    #[serde(deserialize_with = "one_or_many")]
    pub name: Vec<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub args: Vec<ArgSpec>,
    /// Stays valid in every descendant subcommand.
    #[serde(default)]
    pub is_persistent: bool,
    /// Option names that make this option unavailable once used.
    #[serde(default)]
    pub exclusive_on: Vec<String>,
    pub priority: Option<i32>,
    pub insert_value: Option<String>,
    pub icon: Option<String>,
}

impl OptionSpec {
    pub fn new(names: &[&str]) -> Self {
        Self {
            name: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.is_persistent = true;
        self
    }

    pub fn exclusive_on(mut self, names: &[&str]) -> Self {
        self.exclusive_on
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn matches(&self, token: &str) -> bool {
        self.name.iter().any(|n| n == token)
    }

    pub fn takes_args(&self) -> bool {
        !self.args.is_empty()
    }

    /// Returns the longest name, which is what gets displayed by default.
    pub fn long_name(&self) -> &str {
        longest_name(&self.name)
    }
}

/// Location of a spec that a dynamic `loadSpec` can point to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpecLocation {
    /// A spec shipped next to the project, optionally under `path`.
    Local { path: Option<String>, name: String },
    /// A spec from the shared corpus.
    Global { name: String },
}

impl SpecLocation {
    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } | Self::Global { name } => name,
        }
    }
}

/// What a [`DynamicSpec`] callback resolves to.
#[derive(Debug, Clone)]
pub enum LoadedSpec {
    Subcommand(SubcommandSpec),
    Location(SpecLocation),
    Locations(Vec<SpecLocation>),
}

/// Deferred contents of a subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadSpec {
    /// Key of another spec known to the loader (`"aws/s3"`).
    Key(String),
    /// Contents written inline.
    Inline(Box<SubcommandSpec>),
    /// Contents computed at completion time.
    #[serde(skip)]
    Dynamic(DynamicSpec),
}

/// A command or subcommand node.
///
/// Root specs are subcommands too: the root's name is the command itself.
/// Child nodes are shared through [`Arc`] so walking a tree never copies it.
///
/// # Examples
///
/// ```
/// use spec_complete_core::*;
///
/// let git = SubcommandSpec::new("git")
///     .with_option(OptionSpec::new(&["--no-pager"]).persistent())
///     .with_subcommand(SubcommandSpec::new("checkout").with_arg(ArgSpec::new("branch")))
///     .with_subcommand(SubcommandSpec::with_names(&["cherry-pick", "cp"]));
///
/// assert!(git.find_subcommand("checkout").is_some());
/// assert!(git.find_subcommand("cp").is_some());
/// assert!(git.find_subcommand("commit").is_none());
/// assert!(git.find_option("--no-pager").is_some());
///
/// let parsed: SubcommandSpec = serde_json::from_str(
///     r#"{"name": "ls", "options": [{"name": ["-a", "--all"]}], "args": {"template": "filepaths"}}"#,
/// ).unwrap();
/// assert_eq!(parsed.options.len(), 1);
/// assert_eq!(parsed.args[0].template, vec![TemplateKind::Filepaths]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcommandSpec {
    #[serde(deserialize_with = "one_or_many")]
    pub name: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub subcommands: Vec<Arc<SubcommandSpec>>,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub args: Vec<ArgSpec>,
    #[serde(default)]
    pub filter_strategy: FilterStrategy,
    pub load_spec: Option<LoadSpec>,
    pub priority: Option<i32>,
    pub insert_value: Option<String>,
    pub icon: Option<String>,
}

impl SubcommandSpec {
    pub fn new(name: &str) -> Self {
        Self::with_names(&[name])
    }

    /// Creates a node with several aliases.
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            name: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_subcommand(mut self, sub: SubcommandSpec) -> Self {
        self.subcommands.push(Arc::new(sub));
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_filter_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.filter_strategy = strategy;
        self
    }

    pub fn with_load_spec(mut self, load_spec: LoadSpec) -> Self {
        self.load_spec = Some(load_spec);
        self
    }

    /// Primary name, used for cache keys and diagnostics.
    pub fn primary_name(&self) -> &str {
        self.name.first().map(String::as_str).unwrap_or_default()
    }

    pub fn matches(&self, token: &str) -> bool {
        self.name.iter().any(|n| n == token)
    }

    /// Finds a direct child by any of its names.
    pub fn find_subcommand(&self, name: &str) -> Option<&Arc<SubcommandSpec>> {
        self.subcommands.iter().find(|s| s.matches(name))
    }

    /// Finds an option declared directly on this node.
    pub fn find_option(&self, token: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.matches(token))
    }

    /// Returns `true` if this node declares positional arguments.
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

/// Returns the longest of `names`; the last one wins ties.
pub fn longest_name(names: &[String]) -> &str {
    names
        .iter()
        .fold(None::<&String>, |best, n| match best {
            Some(b) if b.len() > n.len() => Some(b),
            _ => Some(n),
        })
        .map(String::as_str)
        .unwrap_or_default()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::<T>::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Name(String),
    Full(SpecSuggestion),
}

fn literal_suggestions<'de, D>(deserializer: D) -> Result<Vec<SpecSuggestion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawSuggestion>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|s| match s {
            RawSuggestion::Name(name) => SpecSuggestion::named(name),
            RawSuggestion::Full(suggestion) => suggestion,
        })
        .collect())
}
