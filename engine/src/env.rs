//! Environment port.
//!
//! Everything the resolver needs from the host goes through [`Environment`]:
//! directory listings, process execution, environment variables and working
//! directory resolution for path-like tokens.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use spec_complete_core::{ExecError, ShellExecutor, ShellOutput, ShellRequest};

use crate::token::CommandToken;

/// Shell flavour the command line was typed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    #[default]
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Shell {
    /// Program used to run generator scripts.
    pub fn program(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::Powershell => "pwsh",
        }
    }

    /// Argv that runs `script` in this shell.
    pub fn script_argv(self, script: &str) -> Vec<String> {
        let flag = match self {
            Self::Powershell => "-Command",
            _ => "-c",
        };
        vec![self.program().to_string(), flag.to_string(), script.to_string()]
    }

    /// Removes escaping from spaces in an unquoted word.
    pub fn unescape_spaces(self, text: &str) -> String {
        match self {
            Self::Powershell => text.replace("` ", " "),
            _ => text.replace("\\ ", " "),
        }
    }

    /// Escapes spaces so the word survives unquoted.
    pub fn escape_spaces(self, text: &str) -> String {
        match self {
            Self::Powershell => text.replace(' ', "` "),
            _ => text.replace(' ', "\\ "),
        }
    }
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: EntryKind::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Working directory chosen for the token being completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCwd {
    pub cwd: PathBuf,
    /// The token names a filesystem path.
    pub pathy: bool,
    /// The token ends in a separator, so nothing of it is left to complete.
    pub complete: bool,
}

impl ResolvedCwd {
    /// `cwd` unchanged, token not pathy.
    pub fn unchanged(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            pathy: false,
            complete: false,
        }
    }
}

/// Host services consumed by the resolver.
pub trait Environment: Send + Sync {
    /// Lists a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Runs a process, killing it once `timeout` elapses.
    fn execute(&self, request: ShellRequest, timeout: Duration) -> Result<ShellOutput, ExecError>;

    /// Decides whether `token` is a path and which directory it points into.
    fn resolve_cwd(&self, token: Option<&CommandToken>, cwd: &Path, shell: Shell) -> ResolvedCwd;

    fn env_vars(&self) -> HashMap<String, String>;
}

/// An [`Environment`] bound to a timeout, handed to spec callbacks.
pub struct ScopedExecutor<'a> {
    env: &'a dyn Environment,
    timeout: Duration,
}

impl<'a> ScopedExecutor<'a> {
    pub fn new(env: &'a dyn Environment, timeout: Duration) -> Self {
        Self { env, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ShellExecutor for ScopedExecutor<'_> {
    fn execute(&self, request: ShellRequest) -> Result<ShellOutput, ExecError> {
        self.env.execute(request, self.timeout)
    }
}
