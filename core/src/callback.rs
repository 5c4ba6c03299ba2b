//! Callback seams that spec trees can carry.
//!
//! JSON specs are pure data. Specs built in Rust can additionally attach
//! callbacks for the dynamic parts of a completion spec: script builders,
//! stdout post-processors, custom generators, template filters and dynamic
//! `loadSpec` resolvers. Each callback is a cheap-to-clone [`Arc`] newtype so
//! spec nodes stay `Clone + Send + Sync`.
//!
//! Callbacks that need to run processes receive a [`ShellExecutor`]; the
//! engine hands them one that is bound to the generator's timeout.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::{LoadedSpec, SpecSuggestion, TemplateSuggestion};

/// Boxed error returned by user callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by user callbacks.
pub type CallbackResult<T> = std::result::Result<T, CallbackError>;

/// A single process invocation.
///
/// # Examples
///
/// ```
/// use spec_complete_core::ShellRequest;
///
/// let req = ShellRequest::new("git").with_args(["branch", "--list"]);
/// assert_eq!(req.command, "git");
/// assert_eq!(req.args, vec!["branch", "--list"]);
/// assert!(req.cwd.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellRequest {
    /// Program to run.
    pub command: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Working directory; the host default when `None`.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables layered over the host environment.
    pub env: HashMap<String, String>,
}

impl ShellRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The full argv, used for diagnostics.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

/// Captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Process execution failures.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// Waiting on the child or reading its pipes failed.
    #[error("failed to wait on '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// The process outlived its timeout and was killed.
    #[error("'{command}' timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },
}

/// Runs a process and captures its output.
pub trait ShellExecutor: Send + Sync {
    fn execute(&self, request: ShellRequest) -> Result<ShellOutput, ExecError>;
}

/// Context handed to [`CustomGenerator`] callbacks.
#[derive(Debug, Clone, Default)]
pub struct GeneratorContext {
    pub environment_variables: HashMap<String, String>,
    pub current_working_directory: PathBuf,
    pub current_process: String,
    pub ssh_prefix: String,
    pub is_dangerous: bool,
    /// Text of the token being completed.
    pub search_term: String,
}

type ScriptFnInner = dyn Fn(&[String]) -> Vec<String> + Send + Sync;

/// Builds a script argv from the tokens typed so far.
#[derive(Clone)]
pub struct ScriptFn(Arc<ScriptFnInner>);

impl ScriptFn {
    pub fn new(f: impl Fn(&[String]) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, tokens: &[String]) -> Vec<String> {
        (self.0)(tokens)
    }
}

impl fmt::Debug for ScriptFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScriptFn(..)")
    }
}

type PostProcessInner = dyn Fn(&str, &[String]) -> Vec<SpecSuggestion> + Send + Sync;

/// Turns a script's trimmed stdout into suggestions.
#[derive(Clone)]
pub struct PostProcess(Arc<PostProcessInner>);

impl PostProcess {
    pub fn new(
        f: impl Fn(&str, &[String]) -> Vec<SpecSuggestion> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, stdout: &str, tokens: &[String]) -> Vec<SpecSuggestion> {
        (self.0)(stdout, tokens)
    }
}

impl fmt::Debug for PostProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostProcess(..)")
    }
}

type CustomGeneratorInner = dyn Fn(&[String], &dyn ShellExecutor, &GeneratorContext) -> CallbackResult<Vec<SpecSuggestion>>
    + Send
    + Sync;

/// Fully custom suggestion source.
///
/// # Examples
///
/// ```
/// use spec_complete_core::{CustomGenerator, GeneratorContext, ShellExecutor, SpecSuggestion};
///
/// let generator = CustomGenerator::new(
///     |tokens: &[String], _exec: &dyn ShellExecutor, _ctx: &GeneratorContext| {
///         Ok(tokens.iter().map(|t| SpecSuggestion::named(t.as_str())).collect())
///     },
/// );
/// # let _ = generator;
/// ```
#[derive(Clone)]
pub struct CustomGenerator(Arc<CustomGeneratorInner>);

impl CustomGenerator {
    pub fn new(
        f: impl Fn(&[String], &dyn ShellExecutor, &GeneratorContext) -> CallbackResult<Vec<SpecSuggestion>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(
        &self,
        tokens: &[String],
        executor: &dyn ShellExecutor,
        context: &GeneratorContext,
    ) -> CallbackResult<Vec<SpecSuggestion>> {
        (self.0)(tokens, executor, context)
    }
}

impl fmt::Debug for CustomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomGenerator(..)")
    }
}

type TemplateFilterInner = dyn Fn(Vec<TemplateSuggestion>) -> Vec<TemplateSuggestion> + Send + Sync;

/// Narrows the entries produced by a generator's templates.
#[derive(Clone)]
pub struct TemplateFilter(Arc<TemplateFilterInner>);

impl TemplateFilter {
    pub fn new(
        f: impl Fn(Vec<TemplateSuggestion>) -> Vec<TemplateSuggestion> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, suggestions: Vec<TemplateSuggestion>) -> Vec<TemplateSuggestion> {
        (self.0)(suggestions)
    }
}

impl fmt::Debug for TemplateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TemplateFilter(..)")
    }
}

type DynamicSpecInner = dyn Fn(&str, &dyn ShellExecutor) -> CallbackResult<LoadedSpec> + Send + Sync;

/// Resolves a subcommand's contents at completion time.
///
/// Receives the matched subcommand token and an executor.
#[derive(Clone)]
pub struct DynamicSpec(Arc<DynamicSpecInner>);

impl DynamicSpec {
    pub fn new(
        f: impl Fn(&str, &dyn ShellExecutor) -> CallbackResult<LoadedSpec> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, token: &str, executor: &dyn ShellExecutor) -> CallbackResult<LoadedSpec> {
        (self.0)(token, executor)
    }
}

impl fmt::Debug for DynamicSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DynamicSpec(..)")
    }
}
