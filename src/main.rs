use anyhow::Context;
use clap::Parser;
use docgenie::{Config, DEFAULT_MODEL};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "docgenie",
    version,
    author,
    about = "Generate project documentation from a source tree with Gemini",
    long_about = "Generate project documentation from a source tree with Gemini.\n\n\
    This tool scans a directory, concatenates the relevant source files into a \
    single prompt, sends it to the Gemini API and writes the response to the \
    output file. Dependency directories, lock files, hidden entries, binaries \
    and oversized files are skipped automatically.\n\n\
    USAGE EXAMPLES:\n  \
      # Document the current project\n  \
      docgenie --code . --doc README.md\n\n  \
      # Preview the file selection without an API key\n  \
      docgenie --code ./my-project --doc README.md --dry-run -v\n\n  \
      # Restrict the selection to Python sources\n  \
      docgenie --code . --doc docs/API.md --include '*.py' --exclude '*.test.*'"
)]
struct Cli {
    /// Root directory of the codebase to document
    #[arg(short, long, value_name = "PATH")]
    code: PathBuf,

    /// Destination path for the generated documentation
    #[arg(short, long, value_name = "PATH")]
    doc: PathBuf,

    /// Gemini API key (falls back to GEMINI_API_KEY, then the .env file)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Model name
    #[arg(long, default_value = DEFAULT_MODEL, value_name = "NAME")]
    model: String,

    /// Whitelist glob; when given, only matching files are considered
    /// (can be used multiple times)
    #[arg(long, value_name = "GLOB")]
    include: Vec<String>,

    /// Exclude glob applied after inclusion (can be used multiple times)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Path to a custom Tera prompt template
    ///
    /// The template receives `repo_path`, `file_count` and `total_lines`.
    /// The selected file contents are appended after the rendered template.
    #[arg(long, value_name = "FILE")]
    prompt: Option<PathBuf>,

    /// Text prepended verbatim to the model response before writing
    #[arg(long, value_name = "TEXT")]
    response_prefix: Option<String>,

    /// System instruction forwarded to the model
    #[arg(long, value_name = "TEXT")]
    system_instruction: Option<String>,

    /// Report the file selection and statistics, then exit without
    /// calling the model or writing the document
    #[arg(long)]
    dry_run: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = Config::builder()
        .root_dir(cli.code)
        .doc_path(cli.doc)
        .model(cli.model)
        .include(cli.include)
        .exclude(cli.exclude)
        .dry_run(cli.dry_run)
        .verbose(cli.verbose > 0);

    if let Some(api_key) = cli.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(prompt) = cli.prompt {
        builder = builder.prompt_path(prompt);
    }

    if let Some(prefix) = cli.response_prefix {
        builder = builder.response_prefix(prefix);
    }

    if let Some(instruction) = cli.system_instruction {
        builder = builder.system_instruction(instruction);
    }

    let config = builder.build().context("Failed to build configuration")?;

    docgenie::run(&config).context("Documentation generation failed")?;

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("docgenie=info"),
        1 => EnvFilter::new("docgenie=debug"),
        _ => EnvFilter::new("docgenie=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
