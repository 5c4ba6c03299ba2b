//! Resolution runtime.
//!
//! [`SuggestionRuntime::get_suggestions`] tokenizes a line, loads the root
//! spec and walks the tokens through subcommands, options and arguments.
//! The walk ends at the first incomplete token (or the end of the line)
//! where a recommendation is built.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use spec_complete_core::{ArgSpec, OptionSpec, SubcommandSpec};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::env::{Environment, ScopedExecutor};
use crate::loader::{ExpansionCache, SpecLoader};
use crate::suggestion::{RecommendationInput, SuggestionBlob, SuggestionProcessor};
use crate::token::{CommandToken, parse_command};

/// Completion engine over a spec loader and an environment.
///
/// The runtime keeps the lazy-expansion cache between requests and is safe
/// to share across threads.
pub struct SuggestionRuntime<L, E> {
    loader: L,
    env: E,
    config: RuntimeConfig,
    cache: ExpansionCache,
}

impl<L: SpecLoader, E: Environment> SuggestionRuntime<L, E> {
    pub fn new(loader: L, env: E) -> Self {
        Self {
            loader,
            env,
            config: RuntimeConfig::default(),
            cache: ExpansionCache::new(),
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn cache(&self) -> &ExpansionCache {
        &self.cache
    }

    /// Suggestions for the last token of `line`, typed in `cwd`.
    ///
    /// Returns `None` when nothing can be suggested: an empty line, a root
    /// command still being typed, an unknown command, a token that matches
    /// nothing in the spec, or a recommendation with neither suggestions nor
    /// an argument description.
    pub fn get_suggestions(&self, line: &str, cwd: &Path) -> Option<SuggestionBlob> {
        let mut tokens = parse_command(line);
        if !tokens.first().is_some_and(|t| t.complete) {
            return None;
        }

        let spec = match self.loader.load_spec(&tokens) {
            Ok(Some(spec)) => spec,
            Ok(None) => {
                debug!(command = %tokens[0].text, "No spec for command");
                return None;
            }
            Err(e) => {
                debug!(command = %tokens[0].text, error = %e, "Failed to load spec");
                return None;
            }
        };

        let resolved = self.env.resolve_cwd(tokens.last(), cwd, self.config.shell);
        if resolved.pathy {
            if let Some(last) = tokens.last_mut() {
                last.is_path = true;
                last.is_path_complete = resolved.complete;
            }
        }

        let walk = Walk {
            loader: &self.loader,
            env: &self.env,
            cache: &self.cache,
            processor: SuggestionProcessor::new(
                &self.env,
                self.config.shell,
                self.config.generator_timeout(),
            ),
            cwd: &resolved.cwd,
            timeout: self.config.generator_timeout(),
            max_depth: self.config.max_depth,
        };
        let mut blob = walk.run_subcommand(&tokens[1..], Frame::root(&spec), false, false, 0)?;
        if blob.suggestions.is_empty() && blob.argument_description.is_none() {
            return None;
        }
        blob.suggestions.truncate(self.config.suggestion_limit);
        blob.characters_to_drop = characters_to_drop(tokens.last());
        Some(blob)
    }

    /// Root commands known to the loader, sorted.
    pub fn spec_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .loader
            .spec_names()
            .into_iter()
            .filter(|name| !name.starts_with('@') && name != "-")
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

fn characters_to_drop(last: Option<&CommandToken>) -> usize {
    match last {
        None => 0,
        Some(token) if token.complete => 0,
        Some(token) if token.is_path && token.is_path_complete => 0,
        Some(token) if token.is_path => token.basename().chars().count(),
        Some(token) => token.text.chars().count(),
    }
}

/// Resolution state at one subcommand.
struct Frame<'s> {
    subcommand: &'s SubcommandSpec,
    /// Names from the root down to `subcommand`, used as the cache scope.
    path: String,
    persistent: Vec<&'s OptionSpec>,
    accepted: Vec<CommandToken>,
}

impl<'s> Frame<'s> {
    fn root(spec: &'s SubcommandSpec) -> Self {
        Self {
            subcommand: spec,
            path: spec.primary_name().to_string(),
            persistent: Vec::new(),
            accepted: Vec::new(),
        }
    }

    fn find_option(&self, token: &str) -> Option<&'s OptionSpec> {
        self.persistent
            .iter()
            .copied()
            .chain(self.subcommand.options.iter())
            .find(|o| o.matches(token))
    }

    fn input<'f>(&'f self, partial_token: Option<&'f CommandToken>, cwd: &'f Path) -> RecommendationInput<'f> {
        RecommendationInput {
            subcommand: self.subcommand,
            persistent_options: &self.persistent,
            partial_token,
            accepted_tokens: &self.accepted,
            cwd,
        }
    }
}

/// Persistent options inherited by children of a subcommand declaring
/// `declared`. Options already inherited by name are not added again.
fn fold_persistent<'s>(inherited: &[&'s OptionSpec], declared: &'s [OptionSpec]) -> Vec<&'s OptionSpec> {
    let mut folded = inherited.to_vec();
    for option in declared.iter().filter(|o| o.is_persistent) {
        let known = folded
            .iter()
            .any(|p| p.name.iter().any(|name| option.matches(name)));
        if !known {
            folded.push(option);
        }
    }
    folded
}

struct Walk<'r> {
    loader: &'r dyn SpecLoader,
    env: &'r dyn Environment,
    cache: &'r ExpansionCache,
    processor: SuggestionProcessor<'r>,
    cwd: &'r Path,
    timeout: Duration,
    max_depth: usize,
}

impl Walk<'_> {
    fn too_deep(&self, depth: usize) -> bool {
        if depth > self.max_depth {
            debug!(max_depth = self.max_depth, "Resolution depth exceeded");
            return true;
        }
        false
    }

    /// `depth` counts subcommand and command transitions, so long argument
    /// lists never trip the guard.
    fn run_subcommand(
        &self,
        tokens: &[CommandToken],
        frame: Frame<'_>,
        args_depleted: bool,
        args_used: bool,
        depth: usize,
    ) -> Option<SuggestionBlob> {
        if self.too_deep(depth) {
            return None;
        }
        let Some(active) = tokens.first().filter(|t| t.complete) else {
            let input = frame.input(tokens.first(), self.cwd);
            return self
                .processor
                .subcommand_driven_recommendation(&input, args_depleted, args_used);
        };

        let subcommand = frame.subcommand;
        if active.is_option {
            let Some(option) = frame.find_option(&active.text) else {
                debug!(
                    option = %active.text,
                    subcommand = subcommand.primary_name(),
                    "Unknown option"
                );
                return None;
            };
            return self.run_option(tokens, option, frame, depth);
        }

        if let Some(child) = subcommand.find_subcommand(&active.text) {
            let child = self.expand(&frame, child, &active.text);
            return self.enter_subcommand(&tokens[1..], &frame, &child, depth + 1);
        }

        if subcommand.has_args() && !(args_depleted && args_used) {
            return self.run_arg(tokens, &subcommand.args, frame, false, false, depth);
        }

        debug!(
            token = %active.text,
            subcommand = subcommand.primary_name(),
            "Token matches no subcommand or argument"
        );
        None
    }

    fn run_option<'s>(
        &self,
        tokens: &[CommandToken],
        option: &'s OptionSpec,
        mut frame: Frame<'s>,
        depth: usize,
    ) -> Option<SuggestionBlob> {
        let (active, rest) = tokens.split_first()?;
        frame.accepted.push(CommandToken {
            is_persistent: option.is_persistent,
            ..active.clone()
        });

        if option.takes_args() {
            self.run_arg(rest, &option.args, frame, true, false, depth)
        } else {
            self.run_subcommand(rest, frame, false, false, depth)
        }
    }

    fn run_arg<'s>(
        &self,
        mut tokens: &[CommandToken],
        mut args: &'s [ArgSpec],
        mut frame: Frame<'s>,
        from_option: bool,
        mut from_variadic: bool,
        depth: usize,
    ) -> Option<SuggestionBlob> {
        loop {
            if args.is_empty() {
                return self.run_subcommand(tokens, frame, true, !from_option, depth);
            }
            let Some(active) = tokens.first().filter(|t| t.complete) else {
                let input = frame.input(tokens.first(), self.cwd);
                return self
                    .processor
                    .arg_driven_recommendation(&input, args, from_variadic);
            };

            if args.iter().all(|a| a.is_optional) {
                if active.is_option {
                    let Some(option) = frame.find_option(&active.text) else {
                        debug!(option = %active.text, "Unknown option after optional arguments");
                        return None;
                    };
                    return self.run_option(tokens, option, frame, depth);
                }
                if let Some(child) = frame.subcommand.find_subcommand(&active.text) {
                    let child = self.expand(&frame, child, &active.text);
                    return self.enter_subcommand(&tokens[1..], &frame, &child, depth + 1);
                }
            }

            let head = &args[0];
            if head.is_variadic {
                frame.accepted.push(active.clone());
                tokens = &tokens[1..];
                from_variadic = true;
                continue;
            }
            if head.is_command {
                return self.run_command_arg(tokens, depth + 1);
            }
            frame.accepted.push(active.clone());
            tokens = &tokens[1..];
            args = &args[1..];
            from_variadic = false;
        }
    }

    /// Hands the remaining tokens to the spec of the command they name.
    fn run_command_arg(&self, tokens: &[CommandToken], depth: usize) -> Option<SuggestionBlob> {
        let command = tokens.first()?;
        let spec = match self.loader.load_spec(tokens) {
            Ok(Some(spec)) => spec,
            Ok(None) => {
                debug!(command = %command.text, "No spec for nested command");
                return None;
            }
            Err(e) => {
                debug!(command = %command.text, error = %e, "Failed to load nested command spec");
                return None;
            }
        };
        self.run_subcommand(&tokens[1..], Frame::root(&spec), false, false, depth)
    }

    fn enter_subcommand(
        &self,
        rest: &[CommandToken],
        frame: &Frame<'_>,
        child: &Arc<SubcommandSpec>,
        depth: usize,
    ) -> Option<SuggestionBlob> {
        let child_frame = Frame {
            subcommand: child.as_ref(),
            path: format!("{} {}", frame.path, child.primary_name()),
            persistent: fold_persistent(&frame.persistent, &frame.subcommand.options),
            accepted: frame
                .accepted
                .iter()
                .filter(|t| t.is_persistent)
                .cloned()
                .collect(),
        };
        self.run_subcommand(rest, child_frame, false, false, depth)
    }

    fn expand(&self, frame: &Frame<'_>, child: &Arc<SubcommandSpec>, token: &str) -> Arc<SubcommandSpec> {
        let executor = ScopedExecutor::new(self.env, self.timeout);
        self.cache
            .expand(self.loader, &frame.path, child, token, &executor)
    }
}
