//! Execute valid plans against the filesystem.
//!
//! Every request is re-checked right before it runs, since an earlier
//! application in the same batch may have claimed its source path. If any
//! request of an application fails, the links already changed for that
//! application are undone in reverse order so it is left as it was.
use std::collections::HashMap;
use std::path::PathBuf;

use super::{AppPlan, PlanFailure};
use crate::config::Action;
use crate::logging::{AppStatus, Log};
use crate::resources::symlink::LinkRequest;
use crate::resources::{Applicable as _, LinkOutcome, LinkState, Resource as _};

/// What happened to one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppResult {
    /// The plan ran (or was previewed) to completion.
    Applied(Vec<(LinkRequest, LinkOutcome)>),
    /// The plan was discarded while building; nothing was applied.
    Discarded(PlanFailure),
    /// A request failed mid-way and the application's earlier changes were undone.
    RolledBack {
        /// The request that failed.
        request: LinkRequest,
        /// Why it failed.
        error: String,
    },
}

/// Per-application report returned by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReport {
    /// Application name.
    pub app: String,
    /// Result of the application.
    pub result: AppResult,
}

impl AppReport {
    /// Outcome of each request for reporting.
    ///
    /// A discarded or rolled-back application reports its blocking request as
    /// [`LinkOutcome::SkippedDueToConflict`]; an unresolvable entry has no
    /// request and reports nothing.
    #[must_use]
    pub fn outcomes(&self) -> Vec<(&LinkRequest, LinkOutcome)> {
        match &self.result {
            AppResult::Applied(outcomes) => outcomes.iter().map(|(r, o)| (r, *o)).collect(),
            AppResult::Discarded(PlanFailure::Conflict { request, .. })
            | AppResult::RolledBack { request, .. } => {
                vec![(request, LinkOutcome::SkippedDueToConflict)]
            }
            AppResult::Discarded(PlanFailure::Unresolved { .. }) => Vec::new(),
        }
    }

    /// Whether the application ended without its links in the desired state.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self.result, AppResult::Applied(_))
    }
}

/// Counters for one application's requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LinkStats {
    changed: u32,
    already_ok: u32,
}

impl LinkStats {
    const fn count(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Created | LinkOutcome::Removed => self.changed += 1,
            LinkOutcome::AlreadySatisfied => self.already_ok += 1,
            LinkOutcome::SkippedDueToConflict => {}
        }
    }

    /// e.g. "2 linked, 1 already ok" or "2 would unlink, 0 already ok".
    fn summary(self, action: Action, dry_run: bool) -> String {
        let verb = match (action, dry_run) {
            (Action::Install, false) => "linked",
            (Action::Install, true) => "would link",
            (Action::Uninstall, false) => "unlinked",
            (Action::Uninstall, true) => "would unlink",
        };
        format!("{} {verb}, {} already ok", self.changed, self.already_ok)
    }
}

/// Sources a dry run would already have changed, each with the target it
/// would be left pointing to (`None` once unlinked).
type Claims = HashMap<PathBuf, Option<PathBuf>>;

/// Apply every valid plan in order, in dry-run mode only previewing.
///
/// Discarded plans are reported without touching the filesystem. Each
/// application's final status is recorded through [`Log::record_app`].
#[must_use]
pub fn apply(plans: &[AppPlan], dry_run: bool, log: &dyn Log) -> Vec<AppReport> {
    let mut claims = Claims::new();
    plans
        .iter()
        .map(|plan| {
            let result = match plan.failure() {
                Some(failure) => {
                    log.record_app(plan.app(), AppStatus::Failed, Some(&failure.to_string()));
                    AppResult::Discarded(failure.clone())
                }
                None if dry_run => preview_plan(plan, &mut claims, log),
                None => apply_plan(plan, log),
            };
            AppReport {
                app: plan.app().to_string(),
                result,
            }
        })
        .collect()
}

/// Preview `plan`, seeing the changes earlier previews in `claims` would
/// have made. The plan's own changes are added unless one of its requests
/// would be skipped, since applying it would then be rolled back.
fn preview_plan(plan: &AppPlan, claims: &mut Claims, log: &dyn Log) -> AppResult {
    log.stage(&format!("{} {}", plan.action(), plan.app()));
    let mut stats = LinkStats::default();
    let mut outcomes = Vec::with_capacity(plan.requests().len());
    let mut pending = Vec::new();

    for request in plan.requests() {
        let outcome = predict(request, claims);
        match outcome {
            LinkOutcome::Created => {
                log.dry_run(&format!("would link: {}", request.description()));
                pending.push((request.source.clone(), Some(request.target.clone())));
            }
            LinkOutcome::Removed => {
                log.dry_run(&format!("would unlink: {}", request.description()));
                pending.push((request.source.clone(), None));
            }
            LinkOutcome::AlreadySatisfied => {
                log.debug(&format!("ok: {}", request.description()));
            }
            LinkOutcome::SkippedDueToConflict => {
                log.warn(&format!("would skip: {}", request.description()));
            }
        }
        stats.count(outcome);
        outcomes.push((request.clone(), outcome));
    }

    if outcomes
        .iter()
        .all(|(_, outcome)| *outcome != LinkOutcome::SkippedDueToConflict)
    {
        claims.extend(pending);
    }

    let summary = stats.summary(plan.action(), true);
    log.info(&summary);
    log.record_app(plan.app(), AppStatus::DryRun, Some(&summary));
    AppResult::Applied(outcomes)
}

/// The outcome executing `request` would have after the changes in `claims`.
fn predict(request: &LinkRequest, claims: &Claims) -> LinkOutcome {
    if let Some(claimed) = claims.get(&request.source) {
        return match (request.action, claimed) {
            (Action::Install, Some(target)) if *target == request.target => {
                LinkOutcome::AlreadySatisfied
            }
            _ => LinkOutcome::SkippedDueToConflict,
        };
    }
    match (request.action, request.current_state()) {
        (Action::Install, Ok(LinkState::Missing)) => LinkOutcome::Created,
        (Action::Install, Ok(LinkState::Linked | LinkState::Covered)) => {
            LinkOutcome::AlreadySatisfied
        }
        (Action::Uninstall, Ok(LinkState::Linked)) => LinkOutcome::Removed,
        _ => LinkOutcome::SkippedDueToConflict,
    }
}

fn apply_plan(plan: &AppPlan, log: &dyn Log) -> AppResult {
    log.stage(&format!("{} {}", plan.action(), plan.app()));
    let mut stats = LinkStats::default();
    let mut outcomes: Vec<(LinkRequest, LinkOutcome)> = Vec::with_capacity(plan.requests().len());

    for request in plan.requests() {
        let error = match request.execute() {
            Ok(LinkOutcome::SkippedDueToConflict) => {
                format!("{} changed since planning", request.source.display())
            }
            Ok(outcome) => {
                log.debug(&format!("{}: {}", outcome.label(), request.description()));
                stats.count(outcome);
                outcomes.push((request.clone(), outcome));
                continue;
            }
            Err(e) => format!("{e:#}"),
        };

        log.error(&format!("{}: {error}", plan.app()));
        roll_back(plan.app(), &outcomes, log);
        log.record_app(plan.app(), AppStatus::Failed, Some(&error));
        return AppResult::RolledBack {
            request: request.clone(),
            error,
        };
    }

    let summary = stats.summary(plan.action(), false);
    log.info(&summary);
    log.record_app(plan.app(), AppStatus::Ok, Some(&summary));
    AppResult::Applied(outcomes)
}

/// Undo the changes recorded in `executed`, newest first.
fn roll_back(app: &str, executed: &[(LinkRequest, LinkOutcome)], log: &dyn Log) {
    let changed = executed
        .iter()
        .rev()
        .filter(|(_, outcome)| matches!(outcome, LinkOutcome::Created | LinkOutcome::Removed));
    for (request, _) in changed {
        let undo = request.inverse();
        match undo.execute() {
            Ok(LinkOutcome::Created | LinkOutcome::Removed) => {
                log.debug(&format!("rolled back: {}", undo.description()));
            }
            Ok(_) => log.warn(&format!(
                "{app}: could not roll back {}",
                undo.description()
            )),
            Err(e) => log.error(&format!(
                "{app}: rollback failed for {}: {e:#}",
                undo.description()
            )),
        }
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{MemoryLog, Record};
    use std::os::unix::fs::symlink;

    struct Fixture {
        _dir: tempfile::TempDir,
        dotfiles: PathBuf,
        home: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dunce::canonicalize(dir.path()).unwrap();
            let dotfiles = root.join("dotfiles");
            let home = root.join("home");
            std::fs::create_dir_all(&dotfiles).unwrap();
            std::fs::create_dir_all(&home).unwrap();
            Self {
                _dir: dir,
                dotfiles,
                home,
            }
        }

        fn request(&self, rel: &str, action: Action) -> LinkRequest {
            let target = self.dotfiles.join(rel);
            if !target.exists() {
                std::fs::write(&target, rel).unwrap();
            }
            LinkRequest::new(self.home.join(rel), target, action)
        }
    }

    #[test]
    fn applies_valid_plan() {
        let fx = Fixture::new();
        let req = fx.request(".vimrc", Action::Install);
        let plan = AppPlan::valid("vim".to_string(), Action::Install, vec![req.clone()]);
        let log = MemoryLog::new();

        let reports = apply(&[plan], false, &log);
        assert_eq!(reports[0].outcomes(), vec![(&req, LinkOutcome::Created)]);
        assert!(!reports[0].is_failure());
        assert_eq!(std::fs::read_link(&req.source).unwrap(), req.target);
        assert_eq!(log.apps()[0].status, AppStatus::Ok);
        assert_eq!(log.apps()[0].message.as_deref(), Some("1 linked, 0 already ok"));
    }

    #[test]
    fn dry_run_previews_without_mutation() {
        let fx = Fixture::new();
        let req = fx.request(".vimrc", Action::Install);
        let plan = AppPlan::valid("vim".to_string(), Action::Install, vec![req.clone()]);
        let log = MemoryLog::new();

        let reports = apply(&[plan], true, &log);
        assert_eq!(reports[0].outcomes(), vec![(&req, LinkOutcome::Created)]);
        assert!(req.source.symlink_metadata().is_err());
        assert_eq!(log.apps()[0].status, AppStatus::DryRun);
        assert!(
            log.records()
                .iter()
                .any(|r| matches!(r, Record::DryRun(msg) if msg.starts_with("would link")))
        );
    }

    #[test]
    fn discarded_plan_reports_conflict_without_mutation() {
        let fx = Fixture::new();
        let req = fx.request(".vimrc", Action::Install);
        std::fs::write(&req.source, "mine").unwrap();
        let plan = AppPlan::discarded(
            "vim".to_string(),
            Action::Install,
            PlanFailure::Conflict {
                request: req.clone(),
                reason: "a regular file is in the way".to_string(),
            },
        );
        let log = MemoryLog::new();

        let reports = apply(&[plan], false, &log);
        assert_eq!(
            reports[0].outcomes(),
            vec![(&req, LinkOutcome::SkippedDueToConflict)]
        );
        assert!(reports[0].is_failure());
        assert_eq!(std::fs::read_to_string(&req.source).unwrap(), "mine");
        assert_eq!(log.apps()[0].status, AppStatus::Failed);
    }

    #[test]
    fn conflict_after_planning_rolls_back_app() {
        let fx = Fixture::new();
        let first = fx.request("a", Action::Install);
        let second = fx.request("b", Action::Install);
        let plan = AppPlan::valid(
            "app".to_string(),
            Action::Install,
            vec![first.clone(), second.clone()],
        );
        // Something appears at the second source after planning.
        std::fs::write(&second.source, "late").unwrap();
        let log = MemoryLog::new();

        let reports = apply(&[plan], false, &log);
        assert!(matches!(
            &reports[0].result,
            AppResult::RolledBack { request, .. } if *request == second
        ));
        assert!(
            first.source.symlink_metadata().is_err(),
            "first link must be rolled back"
        );
        assert_eq!(std::fs::read_to_string(&second.source).unwrap(), "late");
        assert_eq!(log.apps()[0].status, AppStatus::Failed);
    }

    #[test]
    fn uninstall_rollback_restores_links() {
        let fx = Fixture::new();
        let first = fx.request("a", Action::Uninstall);
        let second = fx.request("b", Action::Uninstall);
        symlink(&first.target, &first.source).unwrap();
        // Second source is not the managed link.
        std::fs::write(&second.source, "mine").unwrap();
        let plan = AppPlan::valid(
            "app".to_string(),
            Action::Uninstall,
            vec![first.clone(), second],
        );
        let log = MemoryLog::new();

        let reports = apply(&[plan], false, &log);
        assert!(reports[0].is_failure());
        assert_eq!(std::fs::read_link(&first.source).unwrap(), first.target);
    }

    #[test]
    fn second_claim_of_same_source_is_rolled_back() {
        let fx = Fixture::new();
        let vim = fx.request(".vimrc", Action::Install);
        let other_target = fx.dotfiles.join("other");
        std::fs::write(&other_target, "other").unwrap();
        let other = LinkRequest::new(vim.source.clone(), other_target, Action::Install);
        let plans = [
            AppPlan::valid("vim".to_string(), Action::Install, vec![vim.clone()]),
            AppPlan::valid("other".to_string(), Action::Install, vec![other]),
        ];
        let log = MemoryLog::new();

        let reports = apply(&plans, false, &log);
        assert!(!reports[0].is_failure());
        assert!(reports[1].is_failure());
        assert_eq!(std::fs::read_link(&vim.source).unwrap(), vim.target);
    }

    #[test]
    fn dry_run_sees_sources_claimed_by_earlier_apps() {
        let fx = Fixture::new();
        let vim = fx.request(".vimrc", Action::Install);
        let other_target = fx.dotfiles.join("other");
        std::fs::write(&other_target, "other").unwrap();
        let other = LinkRequest::new(vim.source.clone(), other_target, Action::Install);
        let plans = [
            AppPlan::valid("vim".to_string(), Action::Install, vec![vim.clone()]),
            AppPlan::valid("other".to_string(), Action::Install, vec![other.clone()]),
            AppPlan::valid("vim-again".to_string(), Action::Install, vec![vim.clone()]),
        ];
        let log = MemoryLog::new();

        let reports = apply(&plans, true, &log);
        assert_eq!(reports[0].outcomes(), vec![(&vim, LinkOutcome::Created)]);
        assert_eq!(
            reports[1].outcomes(),
            vec![(&other, LinkOutcome::SkippedDueToConflict)]
        );
        assert_eq!(
            reports[2].outcomes(),
            vec![(&vim, LinkOutcome::AlreadySatisfied)]
        );
        assert!(vim.source.symlink_metadata().is_err());
    }

    #[test]
    fn dry_run_uninstall_does_not_remove_twice() {
        let fx = Fixture::new();
        let first = fx.request("a", Action::Uninstall);
        symlink(&first.target, &first.source).unwrap();
        let plans = [
            AppPlan::valid("one".to_string(), Action::Uninstall, vec![first.clone()]),
            AppPlan::valid("two".to_string(), Action::Uninstall, vec![first.clone()]),
        ];
        let log = MemoryLog::new();

        let reports = apply(&plans, true, &log);
        assert_eq!(reports[0].outcomes(), vec![(&first, LinkOutcome::Removed)]);
        assert_eq!(
            reports[1].outcomes(),
            vec![(&first, LinkOutcome::SkippedDueToConflict)]
        );
        assert_eq!(std::fs::read_link(&first.source).unwrap(), first.target);
    }

    #[test]
    fn stats_summary_wording() {
        let stats = LinkStats {
            changed: 2,
            already_ok: 1,
        };
        assert_eq!(stats.summary(Action::Install, false), "2 linked, 1 already ok");
        assert_eq!(stats.summary(Action::Uninstall, true), "2 would unlink, 1 already ok");
    }
}
