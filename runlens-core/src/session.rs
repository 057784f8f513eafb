// runlens-core/src/session.rs
//
// Terminal session bookkeeping.
//
// One named terminal is shared by every run. The handle lives in a
// single-owner cell inside the extension instance (never a global) and
// is cleared exactly when the host reports that terminal closed.

use crate::TERMINAL_NAME;
use anyhow::{Context, Result};
use runlens_host::{EditorHost, TerminalHandle};

/// Single-owner cell for the shared terminal session handle.
///
/// At most one live handle at a time. Created lazily on the first run,
/// reused by every subsequent run until the close notification clears it.
#[derive(Debug)]
pub struct SessionCell<T> {
    current: Option<T>,
}

impl<T> Default for SessionCell<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: TerminalHandle> SessionCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a handle is currently cached.
    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    /// Resolve the session handle against the host.
    ///
    /// Cached handle if live; otherwise adopt the first open terminal
    /// whose name matches, or create a new one. The returned flag is true
    /// when the handle was freshly adopted or created and must still be
    /// pushed into the host's lifecycle tracking.
    pub fn resolve<H>(&mut self, host: &H) -> Result<(T, bool)>
    where
        H: EditorHost<Terminal = T>,
    {
        if let Some(terminal) = &self.current {
            return Ok((terminal.clone(), false));
        }

        for terminal in host.open_terminals() {
            if terminal.name() == TERMINAL_NAME {
                tracing::debug!("adopted existing {} terminal", TERMINAL_NAME);
                self.current = Some(terminal.clone());
                return Ok((terminal, true));
            }
        }

        let terminal = host
            .create_terminal(TERMINAL_NAME)
            .context("Failed to create runner terminal")?;
        self.current = Some(terminal.clone());
        Ok((terminal, true))
    }

    /// Host terminal-close notification. Clears the cached handle when
    /// the closed terminal is ours, so the next run recreates or
    /// re-adopts one.
    pub fn handle_closed(&mut self, name: &str) {
        if name == TERMINAL_NAME && self.current.is_some() {
            tracing::debug!("{} closed; clearing session handle", TERMINAL_NAME);
            self.current = None;
        }
    }
}
