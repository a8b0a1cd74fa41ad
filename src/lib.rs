//! # docgenie
//!
//! A library for generating project documentation from a source tree with the
//! Gemini API.
//!
//! ## Features
//!
//! - Deterministic file selection with extension, glob and size rules
//! - Prompt assembly from a built-in or user-supplied Tera template
//! - Single synchronous model call, document written atomically
//! - Dry-run mode for previewing the selection without credentials
//!
//! ## Quick Start
//!
//! ```no_run
//! use docgenie::Config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .root_dir("./my-project")
//!     .doc_path("./my-project/README.md")
//!     .api_key("...")
//!     .build()?;
//!
//! docgenie::run(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Selector**: Walks the tree and applies the selection rules
//! 2. **Stats**: Summarizes the selection (lines, bytes, token estimate)
//! 3. **Prompt**: Renders the template and appends the file contents
//! 4. **Provider**: Performs the model call
//! 5. **Writer**: Persists the generated document

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod file;
mod filter;
mod pipeline;
mod prompt;
mod provider;
mod selector;
mod stats;
mod token;
mod writer;

pub use config::{Config, ConfigBuilder, API_KEY_ENV, DEFAULT_MODEL};
pub use error::{Error, Result};
pub use file::FileRecord;
pub use filter::SelectionRules;
pub use pipeline::{run, RunReport};
pub use stats::{summarize, FileStat, SelectionStats};
pub use token::{SimpleTokenizer, TokenEstimator};
