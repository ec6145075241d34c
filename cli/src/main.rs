use std::path::{Path, PathBuf};

use argbind_core::{Bindings, CliError, Registry, Tokens};
use argbind_defs::{DefinitionError, ProgramDefinition};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

/// Exit code for arguments that match no command or fail to parse.
const EXIT_USAGE: i32 = 1;
/// Exit code for definition files that cannot be loaded or built.
const EXIT_DEFINITION: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argbind", version)]
#[command(about = "Tokenize, match and complete command lines against command definitions")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, argbind_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tokens of an argument vector.
    Tokenize(TokenizeArgs),
    /// Select the command matching an argument vector and print its bindings.
    Match(MatchArgs),
    /// Print shell completions for a partial argument vector.
    Complete(CompleteArgs),
    /// Print one usage line per defined command.
    Usage(UsageArgs),
    /// Validate one or more definition files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to tokenize, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    defs: PathBuf,
    /// Reject repeated options regardless of the definition file.
    #[arg(long)]
    strict_duplicates: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to match, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    defs: PathBuf,
    /// Partial arguments to complete, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Definition file (YAML or JSON).
    #[arg(long)]
    defs: PathBuf,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files to load and build.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

/// Error message of a failed subcommand and the exit code it maps to.
#[derive(Debug)]
struct Failure {
    code: i32,
    message: String,
}

impl From<CliError> for Failure {
    fn from(err: CliError) -> Self {
        Self {
            code: EXIT_USAGE,
            message: err.to_string(),
        }
    }
}

impl From<DefinitionError> for Failure {
    fn from(err: DefinitionError) -> Self {
        Self {
            code: EXIT_DEFINITION,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchOutput<'a> {
    command: &'a str,
    bindings: &'a Bindings,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.parse().unwrap_or_default()),
        )
        .init();

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Match(args) => run_match(args),
        Command::Complete(args) => run_complete(args),
        Command::Usage(args) => run_usage(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(failure) = result {
        eprintln!("error: {}", failure.message);
        std::process::exit(failure.code);
    }
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), Failure> {
    let tokens = Tokens::parse(args.args);
    println!("{}", render(tokens.as_slice(), args.format)?);
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<(), Failure> {
    let mut registry = load_registry(&args.defs)?;
    if args.strict_duplicates {
        registry.tolerate_duplicate_options(false);
    }
    let selected = registry.select_args(args.args)?;
    let output = MatchOutput {
        command: selected.schema().name(),
        bindings: selected.bindings(),
    };
    println!("{}", render(&output, args.format)?);
    Ok(())
}

fn run_complete(args: CompleteArgs) -> Result<(), Failure> {
    let registry = load_registry(&args.defs)?;
    let suggestions: Vec<String> = registry.complete(args.args).into_iter().collect();
    println!("{}", suggestions.join(" "));
    Ok(())
}

fn run_usage(args: UsageArgs) -> Result<(), Failure> {
    let definition = ProgramDefinition::load(&args.defs)?;
    let program = definition.program.clone();
    let registry = definition.into_registry()?;
    for schema in registry.schemas() {
        println!("{}", schema.usage(&program));
        if let Some(help) = schema.help() {
            println!("  {help}");
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), Failure> {
    let mut invalid = 0;
    for path in &args.inputs {
        match ProgramDefinition::load(path).and_then(ProgramDefinition::into_registry) {
            Ok(registry) => println!(
                "{}: ok ({} command(s))",
                path.display(),
                registry.schemas().count()
            ),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        return Err(Failure {
            code: EXIT_DEFINITION,
            message: format!("{invalid} of {} definition file(s) invalid", args.inputs.len()),
        });
    }
    Ok(())
}

fn load_registry(path: &Path) -> Result<Registry, Failure> {
    let registry = ProgramDefinition::load(path)?.into_registry()?;
    debug!(path = %path.display(), commands = registry.schemas().count(), "Loaded registry");
    Ok(registry)
}

fn render<T: Serialize + ?Sized>(value: &T, format: CliOutputFormat) -> Result<String, Failure> {
    let rendered = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        CliOutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| Failure {
        code: EXIT_USAGE,
        message,
    })
}
