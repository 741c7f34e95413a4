//! Core logging types: application entries, status, and the [`Log`] trait.

/// Per-application result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    /// Application name from the mapping.
    pub name: String,
    /// Final status of the application.
    pub status: AppStatus,
    /// Optional detail message (e.g., link counts or the failure reason).
    pub message: Option<String>,
}

/// Status of a processed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// Every link of the application is in the desired state.
    Ok,
    /// The application was planned in dry-run mode; no changes were applied.
    DryRun,
    /// The application's plan was discarded; nothing was applied.
    Failed,
}

impl AppStatus {
    /// Short name used as the `status` field of summary events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Abstraction over logging backends.
///
/// The planning core reports progress and errors only through this trait, so
/// it stays independent of the console/file setup done in
/// [`init_subscriber`](super::init_subscriber).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an application result for the summary.
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>);
}
