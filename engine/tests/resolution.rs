use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use spec_complete_core::{
    ArgSpec, ExecError, Generator, LoadSpec, OptionSpec, ShellOutput, ShellRequest,
    SubcommandSpec, SuggestionKind, TemplateKind,
};
use spec_complete_engine::{
    CommandToken, DirEntry, Environment, IconCategory, ResolvedCwd, RuntimeConfig, Shell,
    SpecLoadError, SpecLoader, SuggestionBlob, SuggestionRuntime,
};

/// Specs held in memory, keyed like a spec directory.
#[derive(Default)]
struct MemoryLoader {
    specs: HashMap<String, Arc<SubcommandSpec>>,
    lazy_lookups: AtomicUsize,
}

impl MemoryLoader {
    fn with(mut self, key: &str, spec: SubcommandSpec) -> Self {
        self.specs.insert(key.to_string(), Arc::new(spec));
        self
    }
}

impl SpecLoader for MemoryLoader {
    fn load_spec(&self, tokens: &[CommandToken]) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        let Some(first) = tokens.first() else {
            return Ok(None);
        };
        if first.text == "broken" {
            return Err(SpecLoadError::Invalid {
                key: "broken".to_string(),
                message: "unexpected end of file".to_string(),
            });
        }
        Ok(self.specs.get(&first.text).cloned())
    }

    fn lazy_load_spec(&self, key: &str) -> Result<Option<Arc<SubcommandSpec>>, SpecLoadError> {
        self.lazy_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.specs.get(key).cloned())
    }

    fn spec_names(&self) -> Vec<String> {
        self.specs.keys().cloned().collect()
    }
}

/// In-memory filesystem and canned process output.
#[derive(Default)]
struct MemoryEnv {
    dirs: HashMap<PathBuf, Vec<DirEntry>>,
    outputs: HashMap<String, String>,
}

impl MemoryEnv {
    fn dir(mut self, path: &str, entries: Vec<DirEntry>) -> Self {
        self.dirs.insert(PathBuf::from(path), entries);
        self
    }

    fn output(mut self, argv: &str, stdout: &str) -> Self {
        self.outputs.insert(argv.to_string(), stdout.to_string());
        self
    }

    fn has_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(&normalize(path))
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

impl Environment for MemoryEnv {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        self.dirs
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn execute(&self, request: ShellRequest, _timeout: Duration) -> Result<ShellOutput, ExecError> {
        let argv = request.argv().join(" ");
        match self.outputs.get(&argv) {
            Some(stdout) => Ok(ShellOutput {
                status: 0,
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            None => Err(ExecError::Timeout {
                command: argv,
                timeout_ms: 5000,
            }),
        }
    }

    fn resolve_cwd(&self, token: Option<&CommandToken>, cwd: &Path, _shell: Shell) -> ResolvedCwd {
        let Some(token) = token.filter(|t| t.text.contains('/')) else {
            return ResolvedCwd::unchanged(cwd);
        };
        let complete = token.text.ends_with('/');
        let full = cwd.join(&token.text);
        if self.has_dir(&full) {
            return ResolvedCwd { cwd: full, pathy: true, complete };
        }
        let parent = cwd.join(&token.text[..token.text.rfind('/').map_or(0, |i| i + 1)]);
        if self.has_dir(&parent) {
            return ResolvedCwd { cwd: parent, pathy: true, complete };
        }
        ResolvedCwd::unchanged(cwd)
    }

    fn env_vars(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

fn git_spec() -> SubcommandSpec {
    SubcommandSpec::new("git")
        .with_option(OptionSpec::new(&["--no-pager"]).persistent())
        .with_option(OptionSpec::new(&["-C"]).with_arg(ArgSpec::new("path")))
        .with_subcommand(
            SubcommandSpec::new("checkout")
                .with_option(OptionSpec::new(&["-b"]).with_arg(ArgSpec::new("new-branch")))
                .with_option(OptionSpec::new(&["--quiet", "-q"]))
                .with_arg(
                    ArgSpec::new("branch")
                        .with_description("Branch to switch to")
                        .with_generator(Generator::script("git branch --format=%(refname:short)", "\n")),
                ),
        )
        .with_subcommand(SubcommandSpec::new("cherry-pick"))
        .with_subcommand(SubcommandSpec::new("commit"))
        .with_subcommand(
            SubcommandSpec::new("remote")
                .with_option(OptionSpec::new(&["-v", "--verbose"]).persistent())
                .with_subcommand(SubcommandSpec::new("add").with_arg(ArgSpec::new("name")))
                .with_subcommand(SubcommandSpec::new("remove")),
        )
}

fn ls_spec() -> SubcommandSpec {
    SubcommandSpec::new("ls")
        .with_option(OptionSpec::new(&["-a"]))
        .with_option(OptionSpec::new(&["-l"]))
        .with_option(OptionSpec::new(&["--all"]))
        .with_arg(ArgSpec::new("path").optional().variadic().with_template(TemplateKind::Filepaths))
}

fn cd_spec() -> SubcommandSpec {
    SubcommandSpec::new("cd").with_arg(ArgSpec::new("directory").with_template(TemplateKind::Folders))
}

fn runtime() -> SuggestionRuntime<MemoryLoader, MemoryEnv> {
    let loader = MemoryLoader::default()
        .with("git", git_spec())
        .with("ls", ls_spec())
        .with("cd", cd_spec())
        .with(
            "sudo",
            SubcommandSpec::new("sudo")
                .with_option(OptionSpec::new(&["-u"]).with_arg(ArgSpec::new("user")))
                .with_arg(ArgSpec::new("command").command()),
        )
        .with("@withfig/autocomplete-tools", SubcommandSpec::new("tools"))
        .with("-", SubcommandSpec::new("-"));
    let env = MemoryEnv::default()
        .dir(
            "/proj",
            vec![DirEntry::dir("src"), DirEntry::file("Cargo.toml")],
        )
        .dir(
            "/proj/src",
            vec![
                DirEntry::dir("utils"),
                DirEntry::file("main.rs"),
                DirEntry::dir("components"),
            ],
        )
        .output("bash -c git branch --format=%(refname:short)", "main\nfeature/login\n");
    SuggestionRuntime::new(loader, env)
}

fn names(blob: &SuggestionBlob) -> Vec<&str> {
    blob.suggestions.iter().map(|s| s.name.as_str()).collect()
}

fn suggest(line: &str) -> Option<SuggestionBlob> {
    runtime().get_suggestions(line, Path::new("/proj"))
}

#[test]
fn test_git_partial_subcommand() {
    let blob = suggest("git ch").unwrap();
    assert_eq!(names(&blob), ["checkout", "cherry-pick"]);
    assert_eq!(blob.characters_to_drop, 2);
    assert!(blob.suggestions.iter().all(|s| s.icon == IconCategory::Subcommand));
}

#[test]
fn test_ls_dash_lists_options() {
    let blob = suggest("ls -").unwrap();
    assert_eq!(names(&blob), ["-a", "-l", "--all"]);
    assert_eq!(blob.characters_to_drop, 1);
}

#[test]
fn test_cd_into_directory() {
    let blob = suggest("cd src/").unwrap();
    assert_eq!(names(&blob), ["components", "utils"]);
    assert_eq!(blob.characters_to_drop, 0);
    assert!(blob.suggestions.iter().all(|s| s.pathy && s.icon == IconCategory::Folder));
}

#[test]
fn test_cd_partial_basename() {
    let blob = suggest("cd src/co").unwrap();
    assert_eq!(names(&blob), ["components"]);
    assert_eq!(blob.characters_to_drop, 2);
}

#[test]
fn test_unknown_subcommand_yields_none() {
    assert!(suggest("git frobnicate").is_none());
    assert!(suggest("git frobnicate ").is_none());
}

#[test]
fn test_unknown_option_yields_none() {
    assert!(suggest("git --nope ").is_none());
}

#[test]
fn test_empty_and_incomplete_root() {
    assert!(suggest("").is_none());
    assert!(suggest("gi").is_none());
    assert!(suggest("unknown-tool ").is_none());
}

#[test]
fn test_loader_error_yields_none() {
    assert!(suggest("broken ").is_none());
}

#[test]
fn test_generator_output_for_argument() {
    let blob = suggest("git checkout ").unwrap();
    assert_eq!(names(&blob), ["main", "feature/login", "--no-pager", "-b", "--quiet"]);
    assert_eq!(blob.suggestions[0].priority, 60);
    assert_eq!(blob.argument_description.as_deref(), Some("Branch to switch to"));
    assert_eq!(blob.characters_to_drop, 0);
}

#[test]
fn test_arg_driven_after_option_with_argument() {
    // -b takes a branch name, nothing is known about it
    let blob = suggest("git checkout -b ").unwrap();
    assert!(blob.suggestions.is_empty());
    assert_eq!(blob.argument_description.as_deref(), Some("new-branch"));
}

#[test]
fn test_option_argument_consumed_then_subcommand_args() {
    let blob = suggest("git checkout -b topic m").unwrap();
    assert_eq!(names(&blob), ["main"]);
    assert_eq!(blob.characters_to_drop, 1);
}

#[test]
fn test_args_used_up_yields_none() {
    assert!(suggest("git checkout main ").is_none());
    assert!(suggest("git remote add origin ").is_none());
}

#[test]
fn test_accepted_options_are_not_suggested_again() {
    let blob = suggest("git checkout --quiet -").unwrap();
    assert_eq!(names(&blob), ["--no-pager", "-b"]);
}

#[test]
fn test_persistent_options_reach_subcommands() {
    let blob = suggest("git remote add -").unwrap();
    assert_eq!(names(&blob), ["--no-pager", "-v"]);

    // used persistent options stay accepted in children
    let blob = suggest("git --no-pager remote -").unwrap();
    assert_eq!(names(&blob), ["-v"]);
}

#[test]
fn test_persistent_option_matched_in_child() {
    let blob = suggest("git remote --no-pager ").unwrap();
    assert_eq!(names(&blob), ["add", "remove", "--verbose"]);
}

#[test]
fn test_root_option_with_argument() {
    let blob = suggest("git -C /tmp ch").unwrap();
    assert_eq!(names(&blob), ["checkout", "cherry-pick"]);
}

#[test]
fn test_optional_variadic_keeps_offering_options() {
    let blob = suggest("ls src -").unwrap();
    assert_eq!(names(&blob), ["-a", "-l", "--all"]);

    let blob = suggest("ls -l C").unwrap();
    assert_eq!(names(&blob), ["Cargo.toml"]);
    assert_eq!(blob.suggestions[0].icon, IconCategory::File);
}

#[test]
fn test_command_argument_hands_off() {
    let blob = suggest("sudo git ch").unwrap();
    assert_eq!(names(&blob), ["checkout", "cherry-pick"]);

    let blob = suggest("sudo -u root git remote ").unwrap();
    assert_eq!(names(&blob), ["add", "remove", "--no-pager", "--verbose"]);

    assert!(suggest("sudo nothing-known ").is_none());
}

#[test]
fn test_fuzzy_strategy() {
    let loader = MemoryLoader::default().with(
        "npm",
        SubcommandSpec::new("npm")
            .with_filter_strategy(spec_complete_core::FilterStrategy::Fuzzy)
            .with_subcommand(SubcommandSpec::new("install"))
            .with_subcommand(SubcommandSpec::new("uninstall"))
            .with_subcommand(SubcommandSpec::new("publish")),
    );
    let runtime = SuggestionRuntime::new(loader, MemoryEnv::default());
    let blob = runtime.get_suggestions("npm stall", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["install", "uninstall"]);
}

#[test]
fn test_lazy_load_spec_is_cached() {
    let loader = MemoryLoader::default()
        .with(
            "aws",
            SubcommandSpec::new("aws").with_subcommand(
                SubcommandSpec::new("s3")
                    .with_description("Amazon S3")
                    .with_load_spec(LoadSpec::Key("aws/s3".into())),
            ),
        )
        .with(
            "aws/s3",
            SubcommandSpec::new("s3")
                .with_subcommand(SubcommandSpec::new("ls"))
                .with_subcommand(SubcommandSpec::new("cp")),
        );
    let runtime = SuggestionRuntime::new(loader, MemoryEnv::default());

    let blob = runtime.get_suggestions("aws s3 ", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["ls", "cp"]);
    runtime.get_suggestions("aws s3 c", Path::new("/")).unwrap();
    assert_eq!(runtime.loader().lazy_lookups.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.cache().len(), 1);
}

#[test]
fn test_failed_lazy_load_uses_placeholder() {
    let loader = MemoryLoader::default().with(
        "aws",
        SubcommandSpec::new("aws").with_subcommand(
            SubcommandSpec::new("ec2")
                .with_arg(ArgSpec::new("id").with_suggestions(&["i-123"]))
                .with_load_spec(LoadSpec::Key("aws/ec2".into())),
        ),
    );
    let runtime = SuggestionRuntime::new(loader, MemoryEnv::default());
    let blob = runtime.get_suggestions("aws ec2 ", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["i-123"]);
    assert!(runtime.cache().is_empty());
}

#[test]
fn test_suggestion_limit() {
    let mut spec = SubcommandSpec::new("many");
    for i in 0..150 {
        spec = spec.with_subcommand(SubcommandSpec::new(&format!("sub{i:03}")));
    }
    let runtime = SuggestionRuntime::new(MemoryLoader::default().with("many", spec), MemoryEnv::default());
    let blob = runtime.get_suggestions("many ", Path::new("/")).unwrap();
    assert_eq!(blob.suggestions.len(), 100);

    let limited = runtime.with_config(RuntimeConfig {
        suggestion_limit: 5,
        ..RuntimeConfig::default()
    });
    let blob = limited.get_suggestions("many s", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["sub000", "sub001", "sub002", "sub003", "sub004"]);
}

#[test]
fn test_depth_guard_limits_nesting() {
    let mut spec = SubcommandSpec::new("n");
    for _ in 0..12 {
        spec = SubcommandSpec::new("n").with_subcommand(spec);
    }
    let runtime = SuggestionRuntime::new(MemoryLoader::default().with("n", spec), MemoryEnv::default())
        .with_config(RuntimeConfig {
            max_depth: 8,
            ..RuntimeConfig::default()
        });
    let blob = runtime.get_suggestions("n n n ", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["n"]);
    let nested = format!("n {}", "n ".repeat(10));
    assert!(runtime.get_suggestions(&nested, Path::new("/")).is_none());
}

#[test]
fn test_depth_guard_limits_command_handoffs() {
    let limited = runtime().with_config(RuntimeConfig {
        max_depth: 8,
        ..RuntimeConfig::default()
    });
    let blob = limited.get_suggestions("sudo sudo git ch", Path::new("/proj")).unwrap();
    assert_eq!(names(&blob), ["checkout", "cherry-pick"]);
    let chained = format!("{}git ch", "sudo ".repeat(10));
    assert!(limited.get_suggestions(&chained, Path::new("/proj")).is_none());
}

#[test]
fn test_long_argument_list_still_resolves() {
    let files: Vec<String> = (0..300).map(|i| format!("f{i}")).collect();
    let line = format!("ls {} ", files.join(" "));
    let blob = suggest(&line).unwrap();
    let names = names(&blob);
    assert!(names.contains(&"Cargo.toml"), "names: {names:?}");
    assert!(names.contains(&"-a"), "names: {names:?}");
}

#[test]
fn test_variadic_command_argument_binds_values() {
    let loader = MemoryLoader::default()
        .with("git", git_spec())
        .with(
            "xargs",
            SubcommandSpec::new("xargs").with_arg(ArgSpec::new("command").variadic().command()),
        );
    let runtime = SuggestionRuntime::new(loader, MemoryEnv::default());
    // "git" is bound as a value, so git subcommands are not offered
    let blob = runtime.get_suggestions("xargs git ch", Path::new("/")).unwrap();
    assert!(blob.suggestions.is_empty());
    assert_eq!(blob.argument_description.as_deref(), Some("command"));
}

#[test]
fn test_accepted_escaped_path_is_not_suggested_again() {
    let loader = MemoryLoader::default().with(
        "cat",
        SubcommandSpec::new("cat").with_arg(ArgSpec::new("file").variadic().with_template(TemplateKind::Filepaths)),
    );
    let env = MemoryEnv::default().dir("/proj", vec![DirEntry::file("my file"), DirEntry::file("other")]);
    let runtime = SuggestionRuntime::new(loader, env);
    let blob = runtime.get_suggestions(r"cat my\ file ", Path::new("/proj")).unwrap();
    assert_eq!(names(&blob), ["other"]);

    let blob = runtime.get_suggestions("cat 'my file' ", Path::new("/proj")).unwrap();
    assert_eq!(names(&blob), ["other"]);
}

#[test]
fn test_no_duplicate_names_and_accepted_exclusion() {
    let spec = SubcommandSpec::new("pick").with_arg(
        ArgSpec::new("item")
            .variadic()
            .with_suggestions(&["apple", "apple", "pear"]),
    );
    let runtime = SuggestionRuntime::new(MemoryLoader::default().with("pick", spec), MemoryEnv::default());
    let blob = runtime.get_suggestions("pick pear ", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["apple"]);
}

#[test]
fn test_priority_ordering_is_stable() {
    let spec = SubcommandSpec::new("deploy").with_arg(
        ArgSpec::new("env")
            .with_suggestion(spec_complete_core::SpecSuggestion::named("staging"))
            .with_suggestion(
                spec_complete_core::SpecSuggestion::named("production")
                    .with_priority(90)
                    .with_kind(SuggestionKind::Special),
            )
            .with_suggestion(spec_complete_core::SpecSuggestion::named("dev")),
    );
    let runtime = SuggestionRuntime::new(MemoryLoader::default().with("deploy", spec), MemoryEnv::default());
    let blob = runtime.get_suggestions("deploy ", Path::new("/")).unwrap();
    assert_eq!(names(&blob), ["production", "staging", "dev"]);
    assert_eq!(blob.suggestions[0].icon, IconCategory::Special);
    assert_eq!(blob.argument_description.as_deref(), Some("env"));
}

#[test]
fn test_only_last_pipeline_segment_is_completed() {
    let blob = suggest("cat Cargo.toml | git ch").unwrap();
    assert_eq!(names(&blob), ["checkout", "cherry-pick"]);
}

#[test]
fn test_spec_names_filters_and_sorts() {
    assert_eq!(runtime().spec_names(), ["cd", "git", "ls", "sudo"]);
}
