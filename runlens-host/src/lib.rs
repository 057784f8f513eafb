//! # Runlens Host
//!
//! The Editor Interface Layer.
//! Everything the plugin needs from the host editor — documents,
//! terminals, progress UI, cancellation, lifecycle tracking — crosses
//! through the traits and small types in this crate. No business logic
//! lives here; `runlens-core` stays host-agnostic by depending only on
//! these seams.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ────────────────────────────────────────────────────────────────────
// Documents
// ────────────────────────────────────────────────────────────────────

/// Read access to an open document, line by line.
///
/// The document is owned entirely by the host; the plugin only reads it.
/// Line indices are 0-based.
pub trait DocumentSource {
    /// Number of lines in the document.
    fn line_count(&self) -> usize;

    /// Text of the line at `index`, without its line terminator.
    /// `None` when `index` is out of range.
    fn line(&self, index: usize) -> Option<&str>;
}

/// Trivial in-memory [`DocumentSource`] for simple hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    /// Build a buffer from raw text, splitting on line terminators.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

impl DocumentSource for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

// ────────────────────────────────────────────────────────────────────
// Cancellation
// ────────────────────────────────────────────────────────────────────

/// Cooperative cancellation signal.
///
/// The host owns the semantics: it trips the flag whenever it wants the
/// current operation abandoned. Consumers poll [`CancelFlag::is_cancelled`]
/// between units of work and may return partial results. Clones share
/// the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A fresh, untripped flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag. Irreversible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the flag has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ────────────────────────────────────────────────────────────────────
// Terminals
// ────────────────────────────────────────────────────────────────────

/// Handle to one of the host's terminal sessions.
///
/// Handles are cheap clones of the same underlying terminal. Writing to
/// the terminal is the one host call that may suspend.
#[async_trait]
pub trait TerminalHandle: Clone + Send + Sync + 'static {
    /// The terminal's display name.
    fn name(&self) -> String;

    /// Bring the terminal to the foreground.
    fn show(&self);

    /// Send a literal line of text to the terminal and press Enter.
    ///
    /// Fire and forget: whatever process the line starts is not tracked,
    /// awaited, or killable through this handle.
    async fn send_text(&self, line: &str);

    /// Tear the terminal down. Called by the host's lifecycle tracking
    /// when the owning registry is disposed.
    fn dispose(&self);
}

// ────────────────────────────────────────────────────────────────────
// Progress UI
// ────────────────────────────────────────────────────────────────────

/// Options for a host progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Title shown next to the indicator.
    pub title: String,
    /// Whether the host offers a cancel affordance.
    pub cancellable: bool,
}

impl ProgressOptions {
    /// A cancellable, notification-style indicator.
    pub fn notification(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cancellable: true,
        }
    }
}

/// RAII scope for a host progress indicator.
///
/// The host starts rendering when it hands the scope out and stops when
/// the scope drops. Errors surface through whatever generic presentation
/// the host gives a failed operation inside a progress scope; the scope
/// itself carries no error channel.
pub struct ProgressScope {
    cancel: CancelFlag,
    on_end: Option<Box<dyn FnOnce() + Send>>,
}

impl ProgressScope {
    /// A scope with no end-of-scope callback (tests, headless hosts).
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            cancel,
            on_end: None,
        }
    }

    /// A scope that runs `on_end` when dropped, so the host can stop
    /// rendering its indicator.
    pub fn with_end(cancel: CancelFlag, on_end: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel,
            on_end: Some(Box::new(on_end)),
        }
    }

    /// The cancellation signal tied to the indicator's cancel affordance.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }
}

impl Drop for ProgressScope {
    fn drop(&mut self) {
        if let Some(on_end) = self.on_end.take() {
            on_end();
        }
    }
}

impl fmt::Debug for ProgressScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressScope")
            .field("cancel", &self.cancel)
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────
// The host itself
// ────────────────────────────────────────────────────────────────────

/// The editor host, as the plugin sees it.
///
/// One implementation per host. The plugin never spawns terminals or
/// renders UI itself; it asks for these capabilities here.
pub trait EditorHost: Send + Sync {
    /// The host's terminal handle type.
    type Terminal: TerminalHandle;

    /// Snapshot of the host's currently open terminals.
    fn open_terminals(&self) -> Vec<Self::Terminal>;

    /// Create a new terminal with the given display name.
    fn create_terminal(&self, name: &str) -> anyhow::Result<Self::Terminal>;

    /// Invoke the host's built-in "clear the active terminal" command.
    fn clear_active_terminal(&self);

    /// Start rendering a progress indicator. Rendering stops when the
    /// returned scope drops.
    fn begin_progress(&self, options: ProgressOptions) -> ProgressScope;
}

// ────────────────────────────────────────────────────────────────────
// Lifecycle tracking
// ────────────────────────────────────────────────────────────────────

/// Something the host tears down when the plugin deactivates.
pub trait Disposable: Send {
    /// Release whatever this disposable holds. Called at most once.
    fn dispose(&mut self) {}
}

/// The host's lifecycle tracking, injected at activation.
///
/// The plugin pushes every resource it creates — registrations, adopted
/// or created terminals — into this registry and never manages its own
/// teardown timing. Disposing the registry is deactivation.
#[derive(Default)]
pub struct DisposalRegistry {
    items: Vec<Box<dyn Disposable>>,
}

impl DisposalRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `item` for teardown.
    pub fn push(&mut self, item: Box<dyn Disposable>) {
        self.items.push(item);
    }

    /// Number of tracked items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispose everything, oldest first, and empty the registry.
    pub fn dispose_all(&mut self) {
        let count = self.items.len();
        for mut item in self.items.drain(..) {
            item.dispose();
        }
        tracing::debug!("disposed {} tracked item(s)", count);
    }
}

impl fmt::Debug for DisposalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposalRegistry")
            .field("items", &self.items.len())
            .finish()
    }
}

/// Document filter a code lens provider is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLensFilter {
    /// URI scheme, e.g. `file`.
    pub scheme: String,
    /// Host document-language identifier, e.g. `markdown`.
    pub language: String,
}

impl CodeLensFilter {
    pub fn new(scheme: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            language: language.into(),
        }
    }
}

/// What a [`Registration`] stands for in the host's registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationKind {
    /// A code lens provider keyed by a document filter.
    CodeLensProvider(CodeLensFilter),
    /// A command identifier.
    Command(String),
}

/// Record of a provider or command the plugin registered with the host.
///
/// Pushed into the [`DisposalRegistry`] so the host can withdraw the
/// registration at deactivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    kind: RegistrationKind,
}

impl Registration {
    /// A code lens provider registration.
    pub fn code_lens_provider(filter: CodeLensFilter) -> Self {
        Self {
            kind: RegistrationKind::CodeLensProvider(filter),
        }
    }

    /// A command registration.
    pub fn command(id: impl Into<String>) -> Self {
        Self {
            kind: RegistrationKind::Command(id.into()),
        }
    }

    /// What this registration stands for.
    pub fn kind(&self) -> &RegistrationKind {
        &self.kind
    }
}

impl Disposable for Registration {
    fn dispose(&mut self) {
        tracing::debug!(kind = ?self.kind, "registration withdrawn");
    }
}

/// Wraps a terminal handle so the registry can dispose it at teardown.
pub struct OwnedTerminal<T: TerminalHandle>(pub T);

impl<T: TerminalHandle> Disposable for OwnedTerminal<T> {
    fn dispose(&mut self) {
        self.0.dispose();
    }
}

impl<T: TerminalHandle> fmt::Debug for OwnedTerminal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedTerminal").field(&self.0.name()).finish()
    }
}
