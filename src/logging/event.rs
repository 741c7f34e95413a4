//! Classification of dotie's tracing events, shared by the console and file
//! renderers.
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level};

/// Target of the event that opens a run.
pub(super) const RUN_TARGET: &str = "dotie::run";
/// Target of stage headers.
pub(super) const STAGE_TARGET: &str = "dotie::stage";
/// Target of dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "dotie::dry_run";
/// Target of the end-of-run summary lines.
pub(super) const SUMMARY_TARGET: &str = "dotie::summary";

/// What an event stands for in a dotie run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Kind {
    /// Action, mapping file and selection of the run.
    Run,
    /// Section header such as "Planning 3 application(s)" or "install vim".
    Stage,
    /// A change a dry run would have made.
    DryRun,
    /// One application's final line, or the totals line.
    Summary,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    /// Classify `event` by level and target. Errors and warnings win over
    /// the target.
    pub(super) fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (_, RUN_TARGET) => Self::Run,
            (_, STAGE_TARGET) => Self::Stage,
            (_, DRY_RUN_TARGET) => Self::DryRun,
            (_, SUMMARY_TARGET) => Self::Summary,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// The fields dotie puts on its events.
///
/// Run events carry `version`, `map`, `apps` and `dry_run` with the action as
/// the message; summary lines for an application carry its `status`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Fields {
    pub(super) message: String,
    pub(super) version: String,
    pub(super) map: String,
    pub(super) apps: String,
    pub(super) dry_run: bool,
    pub(super) status: Option<String>,
}

impl Fields {
    pub(super) fn of(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "version" => self.version = value.to_string(),
            "map" => self.map = value.to_string(),
            "apps" => self.apps = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "dry_run" {
            self.dry_run = value;
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}
