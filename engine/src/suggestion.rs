//! Suggestion assembly.
//!
//! Turns spec nodes, literal suggestions, generator output and template
//! entries into ranked [`Suggestion`]s for one recommendation point.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;
use spec_complete_core::{
    ArgSpec, FilterStrategy, Generator, OptionSpec, SpecSuggestion, SubcommandSpec,
    SuggestionKind, TemplateKind, longest_name,
};
use tracing::debug;

use crate::env::{Environment, Shell};
use crate::generator::GeneratorRunner;
use crate::template::run_templates;
use crate::token::CommandToken;

/// Priority for entries that don't set one.
pub const DEFAULT_PRIORITY: i32 = 50;
/// Priority for generator output that doesn't set one.
pub const GENERATOR_PRIORITY: i32 = 60;

/// Display category of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Default,
    Subcommand,
    Option,
    File,
    Folder,
    Arg,
    Mixin,
    Shortcut,
    Special,
}

impl IconCategory {
    pub fn from_kind(kind: Option<SuggestionKind>) -> Self {
        match kind {
            Some(SuggestionKind::Subcommand) => Self::Subcommand,
            Some(SuggestionKind::Option) => Self::Option,
            Some(SuggestionKind::File) => Self::File,
            Some(SuggestionKind::Folder) => Self::Folder,
            Some(SuggestionKind::Arg) => Self::Arg,
            Some(SuggestionKind::Mixin) => Self::Mixin,
            Some(SuggestionKind::Shortcut) => Self::Shortcut,
            Some(SuggestionKind::Special) => Self::Special,
            None => Self::Default,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Default => "•",
            Self::Subcommand => "▶",
            Self::Option => "⚑",
            Self::File => "📄",
            Self::Folder => "📁",
            Self::Arg => "◆",
            Self::Mixin => "⧉",
            Self::Shortcut => "↪",
            Self::Special => "★",
        }
    }
}

/// A completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Name to display, the alias that matched the partial token.
    pub name: String,
    pub all_names: Vec<String>,
    pub description: Option<String>,
    pub icon: IconCategory,
    pub priority: i32,
    pub insert_value: Option<String>,
    /// Names a file or folder.
    pub pathy: bool,
}

/// Result of a completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionBlob {
    pub suggestions: Vec<Suggestion>,
    pub argument_description: Option<String>,
    /// Trailing characters to erase before inserting a suggestion.
    pub characters_to_drop: usize,
}

struct Candidate<'a> {
    names: &'a [String],
    description: Option<&'a String>,
    kind: Option<SuggestionKind>,
    priority: i32,
    insert_value: Option<&'a String>,
}

fn matching_name<'n>(names: &'n [String], strategy: FilterStrategy, partial: &str) -> Option<&'n str> {
    if partial.is_empty() {
        return Some(longest_name(names));
    }
    let needle = partial.to_lowercase();
    names
        .iter()
        .find(|name| {
            let name = name.to_lowercase();
            match strategy {
                FilterStrategy::Fuzzy => name.contains(&needle),
                FilterStrategy::Prefix | FilterStrategy::Default => name.starts_with(&needle),
            }
        })
        .map(String::as_str)
}

fn filter(candidate: Candidate<'_>, strategy: FilterStrategy, partial: &str) -> Option<Suggestion> {
    let name = matching_name(candidate.names, strategy, partial)?;
    Some(Suggestion {
        name: name.to_string(),
        all_names: candidate.names.to_vec(),
        description: candidate.description.cloned(),
        icon: IconCategory::from_kind(candidate.kind),
        priority: candidate.priority,
        insert_value: candidate.insert_value.cloned(),
        pathy: candidate.kind.is_some_and(SuggestionKind::is_pathy),
    })
}

fn literal(suggestion: &SpecSuggestion, default_priority: i32) -> Candidate<'_> {
    Candidate {
        names: &suggestion.name,
        description: suggestion.description.as_ref(),
        kind: suggestion.kind,
        priority: suggestion.priority.unwrap_or(default_priority),
        insert_value: suggestion.insert_value.as_ref(),
    }
}

fn filter_literals(
    suggestions: &[SpecSuggestion],
    default_priority: i32,
    strategy: FilterStrategy,
    partial: &str,
) -> Vec<Suggestion> {
    suggestions
        .iter()
        .filter_map(|s| filter(literal(s, default_priority), strategy, partial))
        .collect()
}

/// Child subcommands matching `partial`.
pub fn subcommand_suggestions(
    subcommands: &[Arc<SubcommandSpec>],
    strategy: FilterStrategy,
    partial: &str,
) -> Vec<Suggestion> {
    subcommands
        .iter()
        .filter_map(|sub| {
            let candidate = Candidate {
                names: &sub.name,
                description: sub.description.as_ref(),
                kind: Some(SuggestionKind::Subcommand),
                priority: sub.priority.unwrap_or(DEFAULT_PRIORITY),
                insert_value: sub.insert_value.as_ref(),
            };
            filter(candidate, strategy, partial)
        })
        .collect()
}

/// Options matching `partial`, minus those excluded by options already used.
pub fn option_suggestions<'o>(
    options: impl IntoIterator<Item = &'o OptionSpec>,
    accepted_tokens: &[CommandToken],
    strategy: FilterStrategy,
    partial: &str,
) -> Vec<Suggestion> {
    let used: HashSet<&str> = accepted_tokens
        .iter()
        .filter(|t| t.is_option)
        .map(|t| t.text.as_str())
        .collect();
    options
        .into_iter()
        .filter(|o| !o.exclusive_on.iter().any(|name| used.contains(name.as_str())))
        .filter_map(|option| {
            let candidate = Candidate {
                names: &option.name,
                description: option.description.as_ref(),
                kind: Some(SuggestionKind::Option),
                priority: option.priority.unwrap_or(DEFAULT_PRIORITY),
                insert_value: option.insert_value.as_ref(),
            };
            filter(candidate, strategy, partial)
        })
        .collect()
}

/// Literal suggestions declared on an argument.
pub fn suggestion_suggestions(
    suggestions: &[SpecSuggestion],
    strategy: FilterStrategy,
    partial: &str,
) -> Vec<Suggestion> {
    filter_literals(suggestions, DEFAULT_PRIORITY, strategy, partial)
}

fn argument_description(arg: &ArgSpec) -> Option<String> {
    arg.description.clone().or_else(|| arg.name.clone())
}

/// Where a recommendation is being made.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub subcommand: &'a SubcommandSpec,
    /// Persistent options inherited from ancestors.
    pub persistent_options: &'a [&'a OptionSpec],
    /// Token being completed; `None` when the line ends in whitespace.
    pub partial_token: Option<&'a CommandToken>,
    pub accepted_tokens: &'a [CommandToken],
    pub cwd: &'a Path,
}

impl<'a> RecommendationInput<'a> {
    /// Text used for filtering, unescaped. Pathy tokens filter on their
    /// basename.
    pub fn partial_text(&self, shell: Shell) -> String {
        let Some(token) = self.partial_token else {
            return String::new();
        };
        let text = match (token.is_path, token.is_path_complete) {
            (true, true) => return String::new(),
            (true, false) => token.basename(),
            (false, _) => token.text.as_str(),
        };
        if token.is_quoted {
            text.to_string()
        } else {
            shell.unescape_spaces(text)
        }
    }

    fn all_options(&self) -> impl Iterator<Item = &'a OptionSpec> + '_ {
        self.persistent_options
            .iter()
            .copied()
            .chain(self.subcommand.options.iter())
    }
}

/// Builds recommendations, running generators and templates as needed.
pub struct SuggestionProcessor<'a> {
    env: &'a dyn Environment,
    shell: Shell,
    generator_timeout: Duration,
}

impl<'a> SuggestionProcessor<'a> {
    pub fn new(env: &'a dyn Environment, shell: Shell, generator_timeout: Duration) -> Self {
        Self {
            env,
            shell,
            generator_timeout,
        }
    }

    /// Runs `generators` concurrently and filters their output.
    ///
    /// Generators see the accepted token texts plus `partial` when it is
    /// non-empty.
    pub fn generator_suggestions(
        &self,
        generators: &[Generator],
        accepted_tokens: &[CommandToken],
        strategy: FilterStrategy,
        partial: &str,
        cwd: &Path,
    ) -> Vec<Suggestion> {
        if generators.is_empty() {
            return Vec::new();
        }
        let mut tokens: Vec<String> = accepted_tokens.iter().map(|t| t.text.clone()).collect();
        if !partial.is_empty() {
            tokens.push(partial.to_string());
        }

        let runner = GeneratorRunner::new(self.env, self.shell, self.generator_timeout);
        let generated: Vec<Vec<SpecSuggestion>> = generators
            .par_iter()
            .map(|generator| runner.run(generator, &tokens, cwd))
            .collect();
        generated
            .iter()
            .flat_map(|batch| filter_literals(batch, GENERATOR_PRIORITY, strategy, partial))
            .collect()
    }

    /// Expands `templates` in `cwd` and filters the entries.
    pub fn template_suggestions(
        &self,
        templates: &[TemplateKind],
        strategy: FilterStrategy,
        partial: &str,
        cwd: &Path,
    ) -> Vec<Suggestion> {
        if templates.is_empty() {
            return Vec::new();
        }
        run_templates(templates, self.env, cwd)
            .iter()
            .filter_map(|t| {
                filter(
                    literal(&t.suggestion, crate::template::TEMPLATE_PRIORITY),
                    strategy,
                    partial,
                )
            })
            .collect()
    }

    /// Generator, literal and template candidates of one argument.
    fn arg_suggestions(&self, arg: &ArgSpec, input: &RecommendationInput<'_>, partial: &str) -> Vec<Suggestion> {
        let strategy = arg.filter_strategy;
        let (mut generated, templated) = rayon::join(
            || {
                self.generator_suggestions(
                    &arg.generators,
                    input.accepted_tokens,
                    strategy,
                    partial,
                    input.cwd,
                )
            },
            || self.template_suggestions(&arg.template, strategy, partial, input.cwd),
        );
        generated.extend(suggestion_suggestions(&arg.suggestions, strategy, partial));
        generated.extend(templated);
        generated
    }

    /// Recommendation at a subcommand: its children, options and first arg.
    ///
    /// Returns `None` once the subcommand's own arguments are used up.
    pub fn subcommand_driven_recommendation(
        &self,
        input: &RecommendationInput<'_>,
        args_depleted: bool,
        args_used: bool,
    ) -> Option<SuggestionBlob> {
        if args_depleted && args_used {
            return None;
        }
        let partial = input.partial_text(self.shell);
        self.log_recommendation("subcommand", input, &partial);

        let strategy = input.subcommand.filter_strategy;
        let mut suggestions = Vec::new();
        if !args_used {
            suggestions.extend(subcommand_suggestions(
                &input.subcommand.subcommands,
                strategy,
                &partial,
            ));
            suggestions.extend(option_suggestions(
                input.all_options(),
                input.accepted_tokens,
                strategy,
                &partial,
            ));
        }
        let active = input.subcommand.args.first();
        if let Some(arg) = active {
            suggestions.extend(self.arg_suggestions(arg, input, &partial));
        }

        Some(SuggestionBlob {
            suggestions: self.post_process(suggestions, input),
            argument_description: active.and_then(argument_description),
            characters_to_drop: 0,
        })
    }

    /// Recommendation for the head of `args`.
    ///
    /// Subcommands and options are offered too when every remaining argument
    /// is optional, or when the head is variadic and already bound.
    pub fn arg_driven_recommendation(
        &self,
        input: &RecommendationInput<'_>,
        args: &[ArgSpec],
        variadic_arg_bound: bool,
    ) -> Option<SuggestionBlob> {
        let active = args.first()?;
        let partial = input.partial_text(self.shell);
        self.log_recommendation("arg", input, &partial);

        let mut suggestions = self.arg_suggestions(active, input, &partial);
        let all_optional = args.iter().all(|a| a.is_optional);
        if all_optional || (active.is_variadic && variadic_arg_bound) {
            let strategy = active.filter_strategy;
            suggestions.extend(subcommand_suggestions(
                &input.subcommand.subcommands,
                strategy,
                &partial,
            ));
            suggestions.extend(option_suggestions(
                input.all_options(),
                input.accepted_tokens,
                strategy,
                &partial,
            ));
        }

        Some(SuggestionBlob {
            suggestions: self.post_process(suggestions, input),
            argument_description: argument_description(active),
            characters_to_drop: 0,
        })
    }

    fn post_process(&self, suggestions: Vec<Suggestion>, input: &RecommendationInput<'_>) -> Vec<Suggestion> {
        let escape = input.partial_token.is_none_or(|t| !t.is_quoted);
        let accepted: HashSet<String> = input
            .accepted_tokens
            .iter()
            .map(|t| {
                if t.is_quoted {
                    t.text.clone()
                } else {
                    self.shell.unescape_spaces(&t.text)
                }
            })
            .collect();
        let mut seen = HashSet::new();

        let mut processed: Vec<Suggestion> = suggestions
            .into_iter()
            .map(|mut s| {
                if escape && s.pathy {
                    match s.insert_value.as_mut() {
                        Some(value) => *value = self.shell.escape_spaces(value),
                        None => s.name = self.shell.escape_spaces(&s.name),
                    }
                }
                s
            })
            .filter(|s| !s.all_names.iter().any(|n| accepted.contains(n.as_str())))
            .filter(|s| !s.name.is_empty())
            .filter(|s| seen.insert(s.name.clone()))
            .collect();
        processed.sort_by(|a, b| b.priority.cmp(&a.priority));
        processed
    }

    fn log_recommendation(&self, kind: &str, input: &RecommendationInput<'_>, partial: &str) {
        let accepted: Vec<&str> = input.accepted_tokens.iter().map(|t| t.text.as_str()).collect();
        debug!(
            recommendation = kind,
            subcommand = input.subcommand.primary_name(),
            partial,
            accepted = ?accepted,
            is_path = input.partial_token.is_some_and(|t| t.is_path),
            is_path_complete = input.partial_token.is_some_and(|t| t.is_path_complete),
            cwd = %input.cwd.display(),
            "Building recommendation"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use spec_complete_core::{ExecError, ShellOutput, ShellRequest};

    use super::*;
    use crate::env::{DirEntry, ResolvedCwd};

    struct DirOnlyEnv(Vec<DirEntry>);

    impl Environment for DirOnlyEnv {
        fn read_dir(&self, _path: &Path) -> io::Result<Vec<DirEntry>> {
            Ok(self.0.clone())
        }

        fn execute(&self, request: ShellRequest, _timeout: Duration) -> Result<ShellOutput, ExecError> {
            Err(ExecError::Spawn {
                command: request.command,
                source: io::Error::from(io::ErrorKind::NotFound),
            })
        }

        fn resolve_cwd(&self, _token: Option<&CommandToken>, cwd: &Path, _shell: Shell) -> ResolvedCwd {
            ResolvedCwd::unchanged(cwd)
        }

        fn env_vars(&self) -> HashMap<String, String> {
            HashMap::new()
        }
    }

    fn processor(env: &DirOnlyEnv) -> SuggestionProcessor<'_> {
        SuggestionProcessor::new(env, Shell::Bash, Duration::from_millis(100))
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    fn input<'a>(
        subcommand: &'a SubcommandSpec,
        partial: Option<&'a CommandToken>,
        accepted: &'a [CommandToken],
    ) -> RecommendationInput<'a> {
        RecommendationInput {
            subcommand,
            persistent_options: &[],
            partial_token: partial,
            accepted_tokens: accepted,
            cwd: Path::new("/proj"),
        }
    }

    #[test]
    fn test_prefix_filter_is_case_insensitive_and_picks_matching_alias() {
        let subs = vec![
            Arc::new(SubcommandSpec::with_names(&["remove", "rm"])),
            Arc::new(SubcommandSpec::new("Rebase")),
            Arc::new(SubcommandSpec::new("add")),
        ];
        let result = subcommand_suggestions(&subs, FilterStrategy::Default, "r");
        assert_eq!(names(&result), ["remove", "Rebase"]);

        let result = subcommand_suggestions(&subs, FilterStrategy::Prefix, "rm");
        assert_eq!(names(&result), ["rm"]);
        assert_eq!(result[0].all_names, ["remove", "rm"]);
    }

    #[test]
    fn test_empty_partial_shows_longest_name() {
        let options = [OptionSpec::new(&["-a", "--all"])];
        let result = option_suggestions(&options, &[], FilterStrategy::Default, "");
        assert_eq!(names(&result), ["--all"]);
        assert_eq!(result[0].icon, IconCategory::Option);
    }

    #[test]
    fn test_fuzzy_filter_matches_substrings() {
        let subs = vec![
            Arc::new(SubcommandSpec::new("cherry-pick")),
            Arc::new(SubcommandSpec::new("checkout")),
        ];
        let result = subcommand_suggestions(&subs, FilterStrategy::Fuzzy, "PICK");
        assert_eq!(names(&result), ["cherry-pick"]);
        assert!(subcommand_suggestions(&subs, FilterStrategy::Default, "pick").is_empty());
    }

    #[test]
    fn test_exclusive_on_hides_options() {
        let options = [
            OptionSpec::new(&["--json"]).exclusive_on(&["--yaml"]),
            OptionSpec::new(&["--yaml"]),
        ];
        let accepted = [CommandToken::complete("--yaml")];
        let result = option_suggestions(&options, &accepted, FilterStrategy::Default, "--");
        assert_eq!(names(&result), ["--yaml"]);
    }

    #[test]
    fn test_literal_suggestions_keep_kind_and_priority() {
        let literals = vec![
            SpecSuggestion::named("main").with_kind(SuggestionKind::Special),
            SpecSuggestion::named("dev").with_priority(90),
        ];
        let result = suggestion_suggestions(&literals, FilterStrategy::Default, "");
        assert_eq!(result[0].icon, IconCategory::Special);
        assert_eq!(result[0].priority, DEFAULT_PRIORITY);
        assert_eq!(result[1].icon, IconCategory::Default);
        assert_eq!(result[1].priority, 90);
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(IconCategory::from_kind(None), IconCategory::Default);
        assert_eq!(
            IconCategory::from_kind(Some(SuggestionKind::Folder)),
            IconCategory::Folder
        );
        assert_eq!(IconCategory::Folder.glyph(), "📁");
    }

    #[test]
    fn test_pipeline_dedupes_sorts_and_drops_accepted() {
        let env = DirOnlyEnv(Vec::new());
        let spec = SubcommandSpec::new("tool")
            .with_subcommand(SubcommandSpec::new("build"))
            .with_option(OptionSpec::new(&["--force"]).persistent())
            .with_option(OptionSpec::new(&["--quiet"]))
            .with_arg(
                ArgSpec::new("target")
                    .with_suggestion(SpecSuggestion::named("build").with_priority(10))
                    .with_suggestion(SpecSuggestion::named("release").with_priority(80))
                    .with_suggestion(SpecSuggestion::named("")),
            );
        let accepted = [CommandToken::complete("--quiet")];
        let blob = processor(&env)
            .subcommand_driven_recommendation(&input(&spec, None, &accepted), false, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["release", "build", "--force"]);
        assert_eq!(blob.argument_description.as_deref(), Some("target"));
    }

    #[test]
    fn test_subcommand_driven_none_after_args_used() {
        let env = DirOnlyEnv(Vec::new());
        let spec = SubcommandSpec::new("tool").with_arg(ArgSpec::new("x"));
        let p = processor(&env);
        assert!(p.subcommand_driven_recommendation(&input(&spec, None, &[]), true, true).is_none());

        // option args ran out, the subcommand's own args are still open
        let blob = p
            .subcommand_driven_recommendation(&input(&spec, None, &[]), true, false)
            .unwrap();
        assert!(blob.suggestions.is_empty());
    }

    #[test]
    fn test_arg_driven_offers_options_only_when_optional_or_bound() {
        let env = DirOnlyEnv(Vec::new());
        let spec = SubcommandSpec::new("tool")
            .with_option(OptionSpec::new(&["--all"]))
            .with_subcommand(SubcommandSpec::new("sub"));
        let required = [ArgSpec::new("file").with_suggestions(&["a"]).variadic()];
        let p = processor(&env);

        let blob = p
            .arg_driven_recommendation(&input(&spec, None, &[]), &required, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["a"]);
        assert_eq!(blob.argument_description.as_deref(), Some("file"));

        let blob = p
            .arg_driven_recommendation(&input(&spec, None, &[]), &required, true)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["a", "sub", "--all"]);

        let optional = [ArgSpec::new("file").with_description("Input file").optional()];
        let blob = p
            .arg_driven_recommendation(&input(&spec, None, &[]), &optional, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["sub", "--all"]);
        assert_eq!(blob.argument_description.as_deref(), Some("Input file"));
    }

    #[test]
    fn test_arg_driven_without_args_is_none() {
        let env = DirOnlyEnv(Vec::new());
        let spec = SubcommandSpec::new("tool");
        assert!(processor(&env)
            .arg_driven_recommendation(&input(&spec, None, &[]), &[], false)
            .is_none());
    }

    #[test]
    fn test_pathy_names_are_escaped_for_unquoted_tokens() {
        let env = DirOnlyEnv(vec![DirEntry::dir("my dir"), DirEntry::file("notes.txt")]);
        let spec = SubcommandSpec::new("cat").with_arg(ArgSpec::new("file").with_template(TemplateKind::Filepaths));
        let p = processor(&env);

        let partial = CommandToken::partial(r"my\ d");
        let blob = p
            .subcommand_driven_recommendation(&input(&spec, Some(&partial), &[]), false, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), [r"my\ dir"]);
        assert!(blob.suggestions[0].pathy);
        assert_eq!(blob.suggestions[0].priority, 55);

        let quoted = CommandToken {
            is_quoted: true,
            ..CommandToken::partial("my d")
        };
        let blob = p
            .subcommand_driven_recommendation(&input(&spec, Some(&quoted), &[]), false, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["my dir"]);
    }

    #[test]
    fn test_insert_value_is_escaped_instead_of_name() {
        let env = DirOnlyEnv(Vec::new());
        let literal = SpecSuggestion::named("a b")
            .with_kind(SuggestionKind::File)
            .with_insert_value("a b/");
        let spec = SubcommandSpec::new("cat").with_arg(ArgSpec::new("f").with_suggestion(literal));
        let blob = processor(&env)
            .subcommand_driven_recommendation(&input(&spec, None, &[]), false, false)
            .unwrap();
        assert_eq!(blob.suggestions[0].name, "a b");
        assert_eq!(blob.suggestions[0].insert_value.as_deref(), Some(r"a\ b/"));
    }

    #[test]
    fn test_partial_text_for_path_tokens() {
        let spec = SubcommandSpec::new("cd");
        let mut token = CommandToken::partial("src/co");
        token.is_path = true;
        assert_eq!(input(&spec, Some(&token), &[]).partial_text(Shell::Bash), "co");
        token.is_path_complete = true;
        assert_eq!(input(&spec, Some(&token), &[]).partial_text(Shell::Bash), "");
        assert_eq!(input(&spec, None, &[]).partial_text(Shell::Bash), "");
    }

    #[test]
    fn test_failed_generator_still_returns_other_sources() {
        let env = DirOnlyEnv(Vec::new());
        let spec = SubcommandSpec::new("git").with_arg(
            ArgSpec::new("branch")
                .with_generator(Generator::script("git branch", "\n"))
                .with_suggestions(&["HEAD"]),
        );
        let blob = processor(&env)
            .subcommand_driven_recommendation(&input(&spec, None, &[]), false, false)
            .unwrap();
        assert_eq!(names(&blob.suggestions), ["HEAD"]);
    }
}
