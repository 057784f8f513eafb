// runlens-core/src/extension.rs
//
// Host-facing wiring: activation, the code lens provider, the run
// command, and terminal lifecycle notifications.

use crate::runner::Runner;
use crate::scanner::{self, RunLens};
use crate::session::SessionCell;
use crate::{RUN_CODE_BLOCK_COMMAND, RunCodeBlockArgs};
use anyhow::Result;
use runlens_host::{
    CancelFlag, CodeLensFilter, DisposalRegistry, DocumentSource, EditorHost, ProgressOptions,
    Registration,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The running plugin instance. The host holds one of these for the
/// plugin's lifetime and routes provider callbacks, command invocations,
/// and terminal-close notifications here.
pub struct Extension<H: EditorHost> {
    host: Arc<H>,
    runner: Runner<H>,
    session: Arc<Mutex<SessionCell<H::Terminal>>>,
}

impl<H: EditorHost> fmt::Debug for Extension<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("runner", &self.runner)
            .finish()
    }
}

impl<H: EditorHost> Extension<H> {
    /// Activate the plugin.
    ///
    /// Registers the code lens provider (file-scheme + markdown filter)
    /// and the run command with the host, pushing both registrations into
    /// the injected registry. Teardown timing stays host-owned: disposing
    /// the registry is the only deactivation there is.
    pub fn activate(host: Arc<H>, registry: &mut DisposalRegistry) -> Self {
        registry.push(Box::new(Registration::code_lens_provider(
            CodeLensFilter::new("file", "markdown"),
        )));
        registry.push(Box::new(Registration::command(RUN_CODE_BLOCK_COMMAND)));

        let session = Arc::new(Mutex::new(SessionCell::new()));
        let runner = Runner::new(host.clone(), session.clone());
        tracing::info!("runlens activated");

        Self {
            host,
            runner,
            session,
        }
    }

    /// Place the scratch directory elsewhere (tests, sandboxed hosts).
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let runner = self.runner;
        self.runner = runner.with_scratch_dir(dir);
        self
    }

    /// `provideCodeLenses`: one "Run" lens per supported fenced block.
    pub fn provide_code_lenses<D>(&self, document: &D, cancel: &CancelFlag) -> Vec<RunLens>
    where
        D: DocumentSource + ?Sized,
    {
        scanner::scan(document, cancel)
    }

    /// The registered run command.
    ///
    /// The whole sequence executes inside a cancellable notification
    /// progress scope. Cancellation only affects the indicator: once the
    /// command line reaches the terminal, the spawned process is not
    /// tracked, awaited, or killable from here.
    pub async fn run_code_block(
        &self,
        args: RunCodeBlockArgs,
        registry: &mut DisposalRegistry,
    ) -> Result<()> {
        let _progress = self
            .host
            .begin_progress(ProgressOptions::notification("Running code block"));
        self.runner.run(&args.language, &args.content, registry).await
    }

    /// Host terminal-close notification.
    pub async fn handle_terminal_closed(&self, name: &str) {
        self.session.lock().await.handle_closed(name);
    }

    /// Whether a terminal session handle is currently cached.
    pub async fn session_is_live(&self) -> bool {
        self.session.lock().await.is_live()
    }
}
