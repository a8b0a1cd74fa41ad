//! Prompt assembly.
//!
//! Renders the prompt template and appends every selected file under a
//! per-file delimiter. Assembly is a pure function of its inputs: the same
//! template and record list always produce byte-identical output.

use crate::{
    config::Config,
    error::{Error, Result},
    file::FileRecord,
};
use tera::{Context, Tera};

/// Built-in prompt template used when `--prompt` is not given.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/readme.tera");

/// Loads the prompt template from configuration, falling back to the
/// built-in template.
///
/// # Errors
///
/// Returns an error if a configured template file cannot be read.
pub(crate) fn load_template(config: &Config) -> Result<String> {
    match config.prompt_path {
        Some(ref path) => std::fs::read_to_string(path).map_err(|e| Error::io(path, e)),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Assembles the full prompt from a template and an ordered record list.
///
/// The template is rendered with `repo_path`, `file_count`, and
/// `total_lines`; every record follows in input order, wrapped in a
/// delimiter that embeds its path.
///
/// # Errors
///
/// Returns [`Error::Template`] if the template fails to render.
pub(crate) fn assemble(template: &str, repo_path: &str, records: &[FileRecord]) -> Result<String> {
    let total_lines: usize = records.iter().map(|r| r.lines).sum();

    let mut context = Context::new();
    context.insert("repo_path", repo_path);
    context.insert("file_count", &records.len());
    context.insert("total_lines", &total_lines);

    let rendered = Tera::one_off(template, &context, false)?;

    let mut prompt = String::with_capacity(
        rendered.len() + records.iter().map(|r| r.content.len() + 64).sum::<usize>(),
    );
    prompt.push_str(&rendered);

    for record in records {
        prompt.push_str("\nFile: ");
        prompt.push_str(&record.relative_path);
        prompt.push_str("\n```\n");
        prompt.push_str(&record.content);
        if !record.content.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str("```\n");
    }

    Ok(prompt)
}
