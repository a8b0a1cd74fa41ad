use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Local key-value configuration file consulted as the last key source.
const DOTENV_FILE: &str = ".env";

/// Model used when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Configuration for a docgenie run.
///
/// Built once at startup and passed to the selector, prompt assembler, and
/// provider; there is no ambient mutable state. Use [`Config::builder()`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root directory to scan for source files
    pub root_dir: PathBuf,

    /// Destination path for the generated documentation
    pub doc_path: PathBuf,

    /// Resolved API key; `None` only in dry-run mode
    pub api_key: Option<String>,

    /// Model name sent to the provider
    pub model: String,

    /// Whitelist include globs; when non-empty, selection is restricted to them
    pub include: Vec<String>,

    /// User exclude globs
    pub exclude: Vec<String>,

    /// Path to a prompt template file; `None` uses the built-in template
    pub prompt_path: Option<PathBuf>,

    /// Text prepended to the provider response before writing
    pub response_prefix: Option<String>,

    /// System instruction forwarded to the provider
    pub system_instruction: Option<String>,

    /// Dry-run mode: selection and statistics only, no remote call or write
    pub dry_run: bool,

    /// Verbose reporting (per-file breakdown)
    pub verbose: bool,
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] if the root directory is missing or not a
    /// directory, and [`Error::Config`] if a required credential or prompt
    /// template is unavailable.
    pub fn validate(&self) -> Result<()> {
        if !self.root_dir.exists() {
            return Err(Error::selection(
                &self.root_dir,
                "input directory does not exist",
            ));
        }

        if !self.root_dir.is_dir() {
            return Err(Error::selection(
                &self.root_dir,
                "input path is not a directory",
            ));
        }

        if let Some(ref prompt_path) = self.prompt_path {
            if !prompt_path.is_file() {
                return Err(Error::config(format!(
                    "Prompt template file does not exist: {}",
                    prompt_path.display()
                )));
            }
        }

        // Dry-run never reaches the provider, so it never needs a key.
        if !self.dry_run && self.api_key.is_none() {
            return Err(Error::config(format!(
                "API key is required. Set {} in the environment or {} file, or pass --api-key",
                API_KEY_ENV, DOTENV_FILE
            )));
        }

        Ok(())
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    doc_path: Option<PathBuf>,
    api_key: Option<String>,
    model: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
    prompt_path: Option<PathBuf>,
    response_prefix: Option<String>,
    system_instruction: Option<String>,
    dry_run: bool,
    verbose: bool,
}

impl ConfigBuilder {
    /// Sets the root directory to scan.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the destination documentation path.
    #[must_use]
    pub fn doc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.doc_path = Some(path.into());
        self
    }

    /// Sets an explicit API key, taking precedence over every other source.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the provider model name.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the whitelist include globs.
    #[must_use]
    pub fn include(mut self, patterns: Vec<String>) -> Self {
        self.include = patterns;
        self
    }

    /// Sets the user exclude globs.
    #[must_use]
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Sets the path to an external prompt template file.
    #[must_use]
    pub fn prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_path = Some(path.into());
        self
    }

    /// Sets the text prepended to the provider response.
    #[must_use]
    pub fn response_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.response_prefix = Some(prefix.into());
        self
    }

    /// Sets the system instruction forwarded to the provider.
    #[must_use]
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Enables dry-run mode (selection and statistics only).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables verbose reporting.
    #[must_use]
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// The API key is resolved here with the documented precedence: explicit
    /// builder value, then the process environment, then the local `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let api_key = resolve_api_key(self.api_key);

        let config = Config {
            root_dir: self.root_dir.unwrap_or_else(|| PathBuf::from(".")),
            doc_path: self.doc_path.unwrap_or_else(|| PathBuf::from("DOCUMENTATION.md")),
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            include: self.include,
            exclude: self.exclude,
            prompt_path: self.prompt_path,
            response_prefix: self.response_prefix,
            system_instruction: self.system_instruction,
            dry_run: self.dry_run,
            verbose: self.verbose,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Resolves the API key with precedence: explicit flag, then environment
/// variable, then the `.env` file in the working directory.
fn resolve_api_key(explicit: Option<String>) -> Option<String> {
    resolve_key_from(explicit, std::env::var(API_KEY_ENV).ok(), Path::new(DOTENV_FILE))
}

fn resolve_key_from(
    explicit: Option<String>,
    env_value: Option<String>,
    dotenv_path: &Path,
) -> Option<String> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        debug!("Using API key from command-line flag");
        return Some(key);
    }

    if let Some(key) = env_value.filter(|k| !k.is_empty()) {
        debug!("Using API key from {} environment variable", API_KEY_ENV);
        return Some(key);
    }

    if let Some(key) = load_dotenv(dotenv_path).remove(API_KEY_ENV) {
        debug!("Using API key from {}", dotenv_path.display());
        return Some(key);
    }

    None
}

/// Parses a `.env`-style key-value file. Missing or unreadable files yield an
/// empty map; credential lookup treats that as "no key from this source".
fn load_dotenv(path: &Path) -> HashMap<String, String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return HashMap::new();
    };

    let mut vars = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                vars.insert(key.trim().to_string(), value.to_string());
            }
        }
    }

    vars
}
