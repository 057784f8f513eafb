// runlens-core/src/runner.rs
//
// Temp-file persistence and terminal dispatch.
//
// A run writes the block's text to a uniquely named file under the
// shared scratch directory and sends the language's run command to the
// shared terminal session. Files are never cleaned up afterwards: a
// known gap, preserved deliberately.

use crate::session::SessionCell;
use anyhow::{Context, Result};
use runlens_host::{DisposalRegistry, EditorHost, OwnedTerminal, TerminalHandle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Command line that executes `path` for a supported language tag.
///
/// Unsupported tags get none. The scanner filters tags before runs are
/// ever triggered, so that branch is dead in normal flow — kept for
/// contract completeness: the file write and terminal steps still happen,
/// nothing is sent.
pub fn run_command(tag: &str, path: &Path) -> Option<String> {
    match tag {
        "go" => Some(format!("go run \"{}\"", path.display())),
        _ => None,
    }
}

/// Dispatches code block runs to the shared terminal session.
pub struct Runner<H: EditorHost> {
    host: Arc<H>,
    session: Arc<Mutex<SessionCell<H::Terminal>>>,
    scratch_dir: PathBuf,
}

impl<H: EditorHost> fmt::Debug for Runner<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

impl<H: EditorHost> Runner<H> {
    /// A runner writing under `<platform-temp-root>/markdown`.
    pub fn new(host: Arc<H>, session: Arc<Mutex<SessionCell<H::Terminal>>>) -> Self {
        Self {
            host,
            session,
            scratch_dir: std::env::temp_dir().join("markdown"),
        }
    }

    /// Place the scratch directory elsewhere (tests, sandboxed hosts).
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Persist `content` verbatim to a fresh file in the scratch
    /// directory: 16 random bytes as hex, dot, the tag as extension.
    /// Owner-only read/write on Unix. No collision retry — the random
    /// name makes collisions negligible.
    pub fn write_snippet(&self, tag: &str, content: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.scratch_dir).with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                self.scratch_dir.display()
            )
        })?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), tag);
        let path = self.scratch_dir.join(file_name);
        write_owner_only(&path, content)
            .with_context(|| format!("Failed to write snippet to {}", path.display()))?;
        Ok(path)
    }

    /// Run one code block.
    ///
    /// Writes the snippet, resolves the shared terminal (adopting or
    /// creating it as needed, and registering a fresh handle with the
    /// host's lifecycle tracking), brings it to the foreground, clears
    /// it, and sends the run command. Filesystem and terminal failures
    /// propagate to the caller's progress scope; nothing is retried or
    /// cleaned up.
    pub async fn run(
        &self,
        tag: &str,
        content: &str,
        registry: &mut DisposalRegistry,
    ) -> Result<()> {
        let path = self.write_snippet(tag, content)?;

        let (terminal, freshly_acquired) = {
            let mut session = self.session.lock().await;
            session.resolve(self.host.as_ref())?
        };
        if freshly_acquired {
            registry.push(Box::new(OwnedTerminal(terminal.clone())));
        }

        terminal.show();
        self.host.clear_active_terminal();

        if let Some(line) = run_command(tag, &path) {
            tracing::info!("running {} block via {}", tag, terminal.name());
            terminal.send_text(&line).await;
        }

        Ok(())
    }
}

/// Create `path` and write `content`, owner read/write only on Unix.
fn write_owner_only(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)?
    };

    #[cfg(not(unix))]
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    file.write_all(content.as_bytes())
}
