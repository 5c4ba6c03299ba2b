//! Generator execution.
//!
//! A [`Generator`] can combine a script, a custom callback and templates.
//! [`GeneratorRunner::run`] merges what they produce in that order and turns
//! any failure into an empty result.

use std::path::Path;
use std::time::Duration;

use spec_complete_core::{
    ExecError, Generator, GeneratorContext, Script, ShellRequest, SpecSuggestion,
};
use thiserror::Error;
use tracing::debug;

use crate::env::{Environment, ScopedExecutor, Shell};
use crate::template::run_templates;

/// Generator failures.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("script exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },
    #[error("script resolved to an empty command")]
    EmptyScript,
    #[error("custom generator failed: {0}")]
    Custom(String),
}

/// Runs generators through an [`Environment`].
pub struct GeneratorRunner<'a> {
    env: &'a dyn Environment,
    shell: Shell,
    default_timeout: Duration,
}

impl<'a> GeneratorRunner<'a> {
    pub fn new(env: &'a dyn Environment, shell: Shell, default_timeout: Duration) -> Self {
        Self {
            env,
            shell,
            default_timeout,
        }
    }

    /// Runs `generator` for `tokens` in `cwd`; failures yield no suggestions.
    pub fn run(&self, generator: &Generator, tokens: &[String], cwd: &Path) -> Vec<SpecSuggestion> {
        match self.try_run(generator, tokens, cwd) {
            Ok(suggestions) => suggestions,
            Err(e) => {
                debug!(
                    script = ?generator.script,
                    split_on = ?generator.split_on,
                    template = ?generator.template,
                    error = %e,
                    "Generator failed"
                );
                Vec::new()
            }
        }
    }

    fn try_run(
        &self,
        generator: &Generator,
        tokens: &[String],
        cwd: &Path,
    ) -> Result<Vec<SpecSuggestion>, GeneratorError> {
        let timeout = generator
            .script_timeout
            .map_or(self.default_timeout, Duration::from_millis);
        let mut suggestions = Vec::new();

        if let Some(script) = &generator.script {
            let stdout = self.run_script(script, tokens, cwd, timeout)?;
            if let Some(post_process) = &generator.post_process {
                suggestions.extend(post_process.call(&stdout, tokens));
            } else if let Some(split_on) = &generator.split_on {
                suggestions.extend(
                    stdout
                        .split(split_on.as_str())
                        .filter(|piece| !piece.is_empty())
                        .map(SpecSuggestion::named),
                );
            }
        }

        if let Some(custom) = &generator.custom {
            let executor = ScopedExecutor::new(self.env, timeout);
            let context = GeneratorContext {
                environment_variables: self.env.env_vars(),
                current_working_directory: cwd.to_path_buf(),
                search_term: tokens.last().cloned().unwrap_or_default(),
                ..Default::default()
            };
            let generated = custom
                .call(tokens, &executor, &context)
                .map_err(|e| GeneratorError::Custom(e.to_string()))?;
            suggestions.extend(generated);
        }

        if !generator.template.is_empty() {
            let mut templated = run_templates(&generator.template, self.env, cwd);
            if let Some(filter) = &generator.filter_template_suggestions {
                templated = filter.call(templated);
            }
            suggestions.extend(templated.into_iter().map(|t| t.suggestion));
        }

        Ok(suggestions)
    }

    fn run_script(
        &self,
        script: &Script,
        tokens: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<String, GeneratorError> {
        let argv = match script {
            Script::Shell(source) => self.shell.script_argv(source),
            Script::Argv(argv) => argv.clone(),
            Script::Dynamic(build) => build.call(tokens),
        };
        let Some((command, args)) = argv.split_first() else {
            return Err(GeneratorError::EmptyScript);
        };

        let request = ShellRequest::new(command.as_str())
            .with_args(args.iter().cloned())
            .with_cwd(cwd);
        let output = self.env.execute(request, timeout)?;
        if !output.success() {
            return Err(GeneratorError::NonZeroExit {
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }
}
