//! Run orchestration.
//!
//! Ties the stages together in a fixed order: validate, select, summarize,
//! then either stop (dry run) or assemble the prompt, call the provider and
//! write the document.

use crate::{
    config::Config,
    error::Result,
    prompt,
    provider::{DocumentationProvider, GeminiClient},
    selector::Selector,
    stats::{self, SelectionStats},
    writer,
};
use tracing::info;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of files included in the prompt.
    pub file_count: usize,
    /// Non-blank line total across the selection.
    pub total_lines: usize,
    /// Approximate prompt token count.
    pub estimated_tokens: usize,
    /// Whether a document was written. False for dry runs.
    pub document_written: bool,
}

impl RunReport {
    fn new(stats: &SelectionStats, document_written: bool) -> Self {
        Self {
            file_count: stats.file_count,
            total_lines: stats.total_lines,
            estimated_tokens: stats.estimated_tokens,
            document_written,
        }
    }
}

/// Executes a full run for the given configuration.
///
/// Dry runs terminate after the selection summary, before any credential or
/// network use.
///
/// # Errors
///
/// Returns an error from any stage: invalid configuration, failed or empty
/// selection, template rendering, the provider call, or writing the output.
pub fn run(config: &Config) -> Result<RunReport> {
    config.validate()?;

    let records = Selector::new(config)?.select()?;
    let stats = stats::summarize(&records);

    stats.print_summary();
    if config.verbose {
        stats.print_verbose();
    }

    if config.dry_run {
        // The point of a dry run is seeing which files would be sent, so the
        // listing is complete and unconditional.
        stats.print_file_list();
        info!("Dry run, stopping before the model call");
        return Ok(RunReport::new(&stats, false));
    }

    let template = prompt::load_template(config)?;
    let repo_path = config.root_dir.display().to_string();
    let assembled = prompt::assemble(&template, &repo_path, &records)?;

    let provider = GeminiClient::new(config)?;
    generate_document(config, &provider, &assembled)?;

    Ok(RunReport::new(&stats, true))
}

/// Calls the provider and writes the result to the configured output path.
fn generate_document(
    config: &Config,
    provider: &dyn DocumentationProvider,
    prompt: &str,
) -> Result<()> {
    info!(model = %config.model, "Requesting documentation");
    let body = provider.generate(prompt, config.system_instruction.as_deref())?;

    writer::write_document(&config.doc_path, config.response_prefix.as_deref(), &body)?;
    info!(path = %config.doc_path.display(), "Documentation written");
    Ok(())
}
