//! Host [`Environment`] backed by `std::fs` and `std::process`.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use spec_complete_core::{ExecError, ShellOutput, ShellRequest};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::env::{DirEntry, EntryKind, Environment, ResolvedCwd, Shell};
use crate::token::CommandToken;

/// Environment of the current process.
#[derive(Debug, Clone, Default)]
pub struct HostEnvironment {
    env_overrides: Vec<(String, String)>,
}

impl HostEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable set for every spawned process.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_overrides.push((key.to_string(), value.to_string()));
        self
    }
}

impl Environment for HostEnvironment {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // follows symlinks
            let kind = match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    fn execute(&self, request: ShellRequest, timeout: Duration) -> Result<ShellOutput, ExecError> {
        let argv = request.argv().join(" ");
        let mut command = Command::new(&request.command);
        command
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in &self.env_overrides {
            command.env(key, value);
        }
        command.envs(&request.env);

        let mut child = command.spawn().map_err(|source| {
            debug!(command = %argv, error = %source, "Failed to spawn process");
            ExecError::Spawn {
                command: argv.clone(),
                source,
            }
        })?;

        // Drain both pipes so a chatty child can't block on a full buffer.
        let stdout_thread = child.stdout.take().map(drain);
        let stderr_thread = child.stderr.take().map(drain);

        match child.wait_timeout(timeout) {
            Ok(Some(status)) => {
                let stdout = join_pipe(stdout_thread, &argv)?;
                let stderr = join_pipe(stderr_thread, &argv)?;
                Ok(ShellOutput {
                    status: status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                })
            }
            Ok(None) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                debug!(command = %argv, timeout_ms, "Process timed out, killing it");
                let _ = child.kill();
                let _ = child.wait();
                Err(ExecError::Timeout {
                    command: argv,
                    timeout_ms,
                })
            }
            Err(source) => {
                debug!(command = %argv, error = %source, "Failed to wait on process");
                let _ = child.kill();
                let _ = child.wait();
                Err(ExecError::Wait {
                    command: argv,
                    source,
                })
            }
        }
    }

    fn resolve_cwd(&self, token: Option<&CommandToken>, cwd: &Path, shell: Shell) -> ResolvedCwd {
        let Some(token) = token else {
            return ResolvedCwd::unchanged(cwd);
        };
        let text = if token.is_quoted {
            token.text.clone()
        } else {
            shell.unescape_spaces(&token.text)
        };
        if !text.contains('/') {
            return ResolvedCwd::unchanged(cwd);
        }

        let complete = text.ends_with('/');
        let resolved = join_token(cwd, &text);
        if is_readable_dir(&resolved) {
            return ResolvedCwd {
                cwd: resolved,
                pathy: true,
                complete,
            };
        }

        // Fall back to the directory the basename is being typed in.
        let dir_text = &text[..text.rfind('/').map_or(0, |i| i + 1)];
        let parent = join_token(cwd, dir_text);
        if is_readable_dir(&parent) {
            return ResolvedCwd {
                cwd: parent,
                pathy: true,
                complete,
            };
        }

        ResolvedCwd::unchanged(cwd)
    }

    fn env_vars(&self) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = std::env::vars().collect();
        vars.extend(self.env_overrides.iter().cloned());
        vars
    }
}

type PipeThread = JoinHandle<io::Result<Vec<u8>>>;

fn drain(mut pipe: impl Read + Send + 'static) -> PipeThread {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_pipe(thread: Option<PipeThread>, argv: &str) -> Result<Vec<u8>, ExecError> {
    let Some(thread) = thread else {
        return Ok(Vec::new());
    };
    match thread.join() {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(source)) => Err(ExecError::Wait {
            command: argv.to_string(),
            source,
        }),
        Err(_) => Err(ExecError::Wait {
            command: argv.to_string(),
            source: io::Error::other("pipe reader panicked"),
        }),
    }
}

fn join_token(cwd: &Path, text: &str) -> PathBuf {
    let path = Path::new(text);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn is_readable_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok()
}
