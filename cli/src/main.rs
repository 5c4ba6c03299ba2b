use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spec_complete_db::{CompletionConfig, SpecDatabase};
use spec_complete_engine::{HostEnvironment, Shell, SuggestionRuntime, parse_command};
use tracing::debug;

mod logging;
mod output;
mod specs;

use output::OutputFormat;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI-specific shell enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl From<CliShell> for Shell {
    fn from(shell: CliShell) -> Self {
        match shell {
            CliShell::Bash => Self::Bash,
            CliShell::Zsh => Self::Zsh,
            CliShell::Fish => Self::Fish,
            CliShell::Powershell => Self::Powershell,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spec-complete")]
#[command(about = "Spec-driven completions for partially typed command lines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Log resolution details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Suggest completions for the last token of a command line.
    Suggest(SuggestArgs),
    /// Show how a command line is tokenized.
    Tokenize(TokenizeArgs),
    /// List the root commands that have specs.
    Specs(SpecsArgs),
    /// Validate one or more spec JSON files.
    Validate(ValidateArgs),
    /// Bundle spec JSON files into a SpecPackage file.
    Bundle(BundleArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Directory of spec JSON files (repeatable, tried in order).
    #[arg(long = "specs")]
    dirs: Vec<PathBuf>,
    /// SpecPackage bundle file (repeatable, tried after directories).
    #[arg(long = "bundle")]
    bundles: Vec<PathBuf>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    /// The command line typed so far. A trailing space starts a new token.
    line: String,
    /// Working directory the line is typed in (default: current directory).
    #[arg(long)]
    cwd: Option<PathBuf>,
    #[command(flatten)]
    sources: SourceArgs,
    /// Maximum number of suggestions.
    #[arg(long)]
    limit: Option<usize>,
    /// Default generator timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Shell the line was typed in.
    #[arg(long)]
    shell: Option<CliShell>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// The command line to tokenize.
    line: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct SpecsArgs {
    #[command(flatten)]
    sources: SourceArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Spec files and/or directories containing spec JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Spec files and/or directories containing spec JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output JSON bundle path.
    #[arg(long)]
    output: PathBuf,
    /// Optional bundle name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional bundle description metadata.
    #[arg(long)]
    description: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::initialize_logging(cli.verbose, cli.quiet) {
        eprintln!("warning: {err}");
    }

    let result = match cli.command {
        Command::Suggest(args) => run_suggest(args),
        Command::Tokenize(args) => run_tokenize(args),
        Command::Specs(args) => run_specs(args),
        Command::Validate(args) => run_validate(args),
        Command::Bundle(args) => run_bundle(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_suggest(args: SuggestArgs) -> Result<(), String> {
    let mut config = load_config(&args.sources)?;
    if let Some(limit) = args.limit {
        config.runtime.suggestion_limit = limit;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.runtime.generator_timeout_ms = timeout_ms;
    }
    if let Some(shell) = args.shell {
        config.runtime.shell = shell.into();
    }

    let cwd = match args.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()
            .map_err(|e| format!("Failed to read current directory: {e}"))?,
    };

    let runtime = SuggestionRuntime::new(open_database(&config)?, HostEnvironment::new())
        .with_config(config.runtime);
    let blob = runtime.get_suggestions(&args.line, &cwd).unwrap_or_default();
    debug!(
        line = %args.line,
        suggestions = blob.suggestions.len(),
        "Resolved suggestions"
    );

    print!("{}", with_newline(output::format_suggestions(&blob, args.format)?));
    Ok(())
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let tokens = parse_command(&args.line);
    print!("{}", with_newline(output::format_tokens(&tokens, args.format)?));
    Ok(())
}

fn run_specs(args: SpecsArgs) -> Result<(), String> {
    let config = load_config(&args.sources)?;
    let runtime = SuggestionRuntime::new(open_database(&config)?, HostEnvironment::new());
    for name in runtime.spec_names() {
        println!("{name}");
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = specs::collect_spec_paths(&args.inputs)?;
    let loaded = specs::load_and_validate_specs(&paths)?;
    println!(
        "Validated {} spec file(s) for {} command(s).",
        paths.len(),
        loaded.len()
    );
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let paths = specs::collect_spec_paths(&args.inputs)?;
    let package = specs::bundle_spec_files(&paths, PACKAGE_VERSION, args.name, args.description)?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = serde_json::to_string_pretty(&package)
        .map_err(|err| format!("Failed to serialize spec bundle: {err}"))?;
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} spec(s) into '{}'.",
        package.spec_count(),
        args.output.display()
    );

    Ok(())
}

/// Config file (if any) with command-line sources taking precedence.
fn load_config(sources: &SourceArgs) -> Result<CompletionConfig, String> {
    let mut config = match &sources.config {
        Some(path) => CompletionConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => CompletionConfig::default(),
    };

    if !sources.dirs.is_empty() || !sources.bundles.is_empty() {
        config.specs.dirs = sources.dirs.clone();
        config.specs.bundles = sources.bundles.clone();
    }

    if config.specs.is_empty() {
        return Err("No spec sources given; pass --specs, --bundle or --config".to_string());
    }
    Ok(config)
}

fn open_database(config: &CompletionConfig) -> Result<SpecDatabase, String> {
    config
        .database()
        .map_err(|e| format!("Failed to load specs: {e}"))
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
