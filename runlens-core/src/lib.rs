//! # Runlens Core
//!
//! Detects fenced code blocks of a recognized language in a text
//! document, offers an inline "Run" lens above each one, and on
//! invocation writes the block to a temporary file and executes it in a
//! reused terminal session. The host editor is reached exclusively
//! through the `runlens-host` seams.

pub mod extension;
pub mod runner;
pub mod scanner;
pub mod session;

// Re-export the main struct so hosts can just use `runlens_core::Extension`.
pub use extension::Extension;
pub use scanner::{RunLens, scan};

use serde::{Deserialize, Serialize};

/// Marker that opens and closes a fenced code block.
pub const CODE_BLOCK_DELIMITER: &str = "```";

/// Name of the shared terminal session runs are dispatched to.
pub const TERMINAL_NAME: &str = "markdown-runner";

/// Command identifier the extension registers with the host.
pub const RUN_CODE_BLOCK_COMMAND: &str = "runlens.runCodeBlock";

/// Language tags the runner knows how to execute.
pub const SUPPORTED_LANGUAGES: &[&str] = &["go"];

/// Whether `tag` is on the supported-language allow-list.
pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&tag)
}

/// Arguments attached to a "Run" lens and delivered back through the
/// host command registry when the user triggers it.
///
/// The host shuttles these as JSON; the language tag travels as `type`
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCodeBlockArgs {
    /// Language tag of the block.
    #[serde(rename = "type")]
    pub language: String,
    /// Exact text between the block's delimiter lines.
    pub content: String,
}
