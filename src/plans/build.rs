//! Build one conflict-checked [`AppPlan`] per selected application.
use std::collections::HashSet;
use std::path::PathBuf;

use super::resolve::Resolver;
use super::{AppPlan, PlanFailure};
use crate::config::Action;
use crate::config::mapping::{App, Entry, Mapping};
use crate::error::{DotieError, ResolveError};
use crate::logging::Log;
use crate::resources::symlink::LinkRequest;
use crate::resources::{Applicable as _, Resource as _, Verdict};

/// Resolve and conflict-check every entry of the selected applications.
///
/// Applications are planned in the order of `selected` (mapping order when
/// empty). Each plan is discarded on its first unresolvable entry or
/// conflicting request; other applications are unaffected. Within a valid
/// plan, requests sharing a source path are collapsed to the first one.
///
/// Checking only reads the filesystem.
///
/// # Errors
///
/// Returns [`DotieError::UnknownApp`] if `selected` names an application the
/// mapping does not define, and [`DotieError::Walk`] if walking a wildcard
/// directory fails. Both abort the run before anything is applied.
pub fn build_plans(
    mapping: &Mapping,
    selected: &[String],
    resolver: &Resolver,
    action: Action,
    log: &dyn Log,
) -> Result<Vec<AppPlan>, DotieError> {
    build_plans_with(mapping, selected, action, log, |entry| {
        resolver.resolve(&entry.source, &entry.target, action)
    })
}

/// [`build_plans`] with entry resolution supplied by the caller.
fn build_plans_with(
    mapping: &Mapping,
    selected: &[String],
    action: Action,
    log: &dyn Log,
    mut resolve: impl FnMut(&Entry) -> Result<Vec<LinkRequest>, ResolveError>,
) -> Result<Vec<AppPlan>, DotieError> {
    let apps = mapping.select(selected)?;
    log.stage(&format!("Planning {} application(s)", apps.len()));

    let mut plans = Vec::with_capacity(apps.len());
    for app in apps {
        let plan = plan_app(app, action, log, &mut resolve)?;
        match plan.failure() {
            None => log.debug(&format!(
                "{}: {} link(s) planned",
                plan.app(),
                plan.requests().len()
            )),
            Some(failure) => log.error(&format!("{}: {failure}", plan.app())),
        }
        plans.push(plan);
    }
    Ok(plans)
}

fn plan_app(
    app: &App,
    action: Action,
    log: &dyn Log,
    resolve: &mut impl FnMut(&Entry) -> Result<Vec<LinkRequest>, ResolveError>,
) -> Result<AppPlan, DotieError> {
    let mut requests: Vec<LinkRequest> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for entry in &app.entries {
        let resolved = match resolve(entry) {
            Ok(resolved) => resolved,
            Err(e) => {
                let e = e.escalate()?;
                return Ok(AppPlan::discarded(
                    app.name.clone(),
                    action,
                    PlanFailure::Unresolved {
                        entry: entry.target.clone(),
                        reason: e.to_string(),
                    },
                ));
            }
        };
        if resolved.is_empty() {
            log.warn(&format!(
                "{}: '{}' matched no files",
                app.name, entry.target
            ));
        }

        for request in resolved {
            // First occurrence owns the source; later ones are never checked.
            if !seen.insert(request.source.clone()) {
                log.debug(&format!(
                    "{}: duplicate source skipped: {}",
                    app.name,
                    request.description()
                ));
                continue;
            }
            if let Some(reason) = conflict_reason(&request, action) {
                return Ok(AppPlan::discarded(
                    app.name.clone(),
                    action,
                    PlanFailure::Conflict { request, reason },
                ));
            }
            requests.push(request);
        }
    }

    Ok(AppPlan::valid(app.name.clone(), action, requests))
}

/// Conflict reason for `request`, or `None` when it may proceed.
///
/// A state check that cannot read the filesystem counts as a conflict.
fn conflict_reason(request: &LinkRequest, action: Action) -> Option<String> {
    match request.check(action) {
        Ok(Verdict::Conflict { reason }) => Some(reason),
        Ok(Verdict::Ok | Verdict::AlreadySatisfied) => None,
        Err(e) => Some(format!("{e:#}")),
    }
}
