// runlens-core/src/scanner.rs
//
// Fenced block detection.
//
// Walks a document's lines once and yields a "Run" lens anchored above
// every fenced block whose language tag is on the supported list.
// Malformed blocks (no closing delimiter) and unsupported tags are
// skipped silently: no region, no diagnostic.

use crate::{CODE_BLOCK_DELIMITER, RUN_CODE_BLOCK_COMMAND, RunCodeBlockArgs, is_supported};
use runlens_host::{CancelFlag, DocumentSource};

/// An actionable "Run" region anchored above a fenced code block.
///
/// Constructed fresh on every scan and discarded by the host after
/// rendering; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLens {
    /// 0-based line index of the opening delimiter.
    pub anchor_line: usize,
    /// Command identifier the host invokes when the lens is triggered.
    pub command: String,
    /// Label rendered inline.
    pub title: String,
    /// Hover tooltip.
    pub tooltip: String,
    /// Arguments handed back to the command.
    pub args: RunCodeBlockArgs,
}

/// Scan `document` for runnable fenced code blocks.
///
/// Single forward pass:
/// 1. A line opens a block when it starts with the marker and the trimmed
///    remainder is non-empty — that remainder is the tag.
/// 2. The first later line starting with the bare marker closes it;
///    trailing characters there are tolerated (a close carries no tag).
/// 3. No close before end of document → the block is dropped silently.
/// 4. The outer loop resumes at the line after the open, so delimiter
///    lines consumed as block content are not specially excluded.
///
/// `cancel` is checked between regions; once tripped, whatever has been
/// produced so far is returned — partial results carry no guarantee.
pub fn scan<D: DocumentSource + ?Sized>(document: &D, cancel: &CancelFlag) -> Vec<RunLens> {
    let mut lenses = Vec::new();
    let line_count = document.line_count();

    for i in 0..line_count {
        if cancel.is_cancelled() {
            break;
        }

        let Some(line) = document.line(i) else {
            continue;
        };
        let Some(rest) = line.strip_prefix(CODE_BLOCK_DELIMITER) else {
            continue;
        };
        let tag = rest.trim();
        if tag.is_empty() {
            // Bare marker: a close, never an open.
            continue;
        }

        let mut close = None;
        for j in (i + 1)..line_count {
            if document
                .line(j)
                .is_some_and(|l| l.starts_with(CODE_BLOCK_DELIMITER))
            {
                close = Some(j);
                break;
            }
        }
        let Some(end) = close else {
            continue;
        };

        if !is_supported(tag) {
            continue;
        }

        // Exact text strictly between the delimiter lines, each content
        // line with its terminating newline.
        let mut content = String::new();
        for k in (i + 1)..end {
            if let Some(text) = document.line(k) {
                content.push_str(text);
                content.push('\n');
            }
        }

        lenses.push(RunLens {
            anchor_line: i,
            command: RUN_CODE_BLOCK_COMMAND.to_string(),
            title: "Run".to_string(),
            tooltip: format!("Run {tag} code block"),
            args: RunCodeBlockArgs {
                language: tag.to_string(),
                content,
            },
        });
    }

    tracing::debug!("scan produced {} lens(es)", lenses.len());
    lenses
}
