//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::event::{DRY_RUN_TARGET, RUN_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use super::file::log_file_path;
use super::types::{AppEntry, AppStatus, Log};
use crate::config::Settings;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages are emitted as [`tracing`] events; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) renders them on the console
/// and appends them to `$XDG_CACHE_HOME/dotie/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    apps: Mutex<Vec<AppEntry>>,
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display in the run summary; the file
    /// itself is written by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            apps: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded application entries.
    #[must_use]
    pub fn app_entries(&self) -> Vec<AppEntry> {
        self.apps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Announce the run: action, selection, mapping file and dry-run flag.
    ///
    /// The file log turns this into its header block.
    pub fn begin_run(&self, version: &str, settings: &Settings) {
        let apps = if settings.apps.is_empty() {
            "all".to_string()
        } else {
            settings.apps.join(", ")
        };
        tracing::info!(
            target: RUN_TARGET,
            version,
            map = %settings.map_file.display(),
            apps = apps.as_str(),
            dry_run = settings.dry_run,
            "{}",
            settings.action
        );
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an application result for the summary.
    pub fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.apps.lock() {
            guard.push(AppEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed applications.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.apps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|a| a.status == AppStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded applications.
    pub fn print_summary(&self) {
        let apps = self.app_entries();
        if apps.is_empty() {
            return;
        }

        self.stage("Summary");
        for app in &apps {
            tracing::info!(target: SUMMARY_TARGET, status = app.status.label(), "{}", app_line(app));
        }
        tracing::info!(target: SUMMARY_TARGET, "{}", totals_line(&apps));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}

/// "✓ vim (1 linked, 0 already ok)"
fn app_line(app: &AppEntry) -> String {
    let icon = match app.status {
        AppStatus::Ok => '✓',
        AppStatus::DryRun => '~',
        AppStatus::Failed => '✗',
    };
    match &app.message {
        Some(msg) => format!("{icon} {} ({msg})", app.name),
        None => format!("{icon} {}", app.name),
    }
}

/// "3 apps: 1 ok, 1 dry-run, 1 failed"
fn totals_line(apps: &[AppEntry]) -> String {
    let count = |status: AppStatus| apps.iter().filter(|a| a.status == status).count();
    format!(
        "{} apps: {} ok, {} dry-run, {} failed",
        apps.len(),
        count(AppStatus::Ok),
        count(AppStatus::DryRun),
        count(AppStatus::Failed)
    )
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        self.record_app(name, status, message);
    }
}
