//! Per-application link plans: resolve, check, and apply.
//!
//! A run flows through three stages:
//!
//! 1. [`resolve`](mod@resolve) expands each mapping entry into concrete [`LinkRequest`]s.
//! 2. [`build_plans`] conflict-checks every request and assembles one [`AppPlan`]
//!    per application, discarding the whole plan on the first problem.
//! 3. [`apply()`] executes valid plans and reports per-application results.
pub mod apply;
pub mod build;
pub mod resolve;

pub use apply::{AppReport, AppResult, apply};
pub use build::build_plans;
pub use resolve::Resolver;

use crate::config::Action;
use crate::resources::symlink::LinkRequest;

/// Why an application's plan was thrown away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanFailure {
    /// A mapping entry could not be expanded into link requests.
    Unresolved {
        /// Target spec of the offending entry.
        entry: String,
        /// Human-readable cause.
        reason: String,
    },
    /// A resolved request would clobber or remove something unmanaged.
    Conflict {
        /// The blocking request.
        request: LinkRequest,
        /// Human-readable cause.
        reason: String,
    },
}

impl std::fmt::Display for PlanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved { entry, reason } => write!(f, "cannot resolve '{entry}': {reason}"),
            Self::Conflict { request, reason } => {
                write!(f, "conflict at {}: {reason}", request.source.display())
            }
        }
    }
}

/// Outcome of planning one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStatus {
    /// Every request passed conflict checking.
    Valid,
    /// The plan was discarded; none of its requests will be applied.
    Discarded(PlanFailure),
}

/// The resolved, conflict-checked batch of link operations for one application.
///
/// A plan is either valid with its full request list, or discarded with no
/// requests at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPlan {
    app: String,
    action: Action,
    requests: Vec<LinkRequest>,
    status: PlanStatus,
}

impl AppPlan {
    /// A plan whose requests all passed checking.
    #[must_use]
    pub const fn valid(app: String, action: Action, requests: Vec<LinkRequest>) -> Self {
        Self {
            app,
            action,
            requests,
            status: PlanStatus::Valid,
        }
    }

    /// A plan that must not be applied.
    #[must_use]
    pub const fn discarded(app: String, action: Action, failure: PlanFailure) -> Self {
        Self {
            app,
            action,
            requests: Vec::new(),
            status: PlanStatus::Discarded(failure),
        }
    }

    /// Application name.
    #[must_use]
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Requested action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Requests to apply; always empty for a discarded plan.
    #[must_use]
    pub fn requests(&self) -> &[LinkRequest] {
        &self.requests
    }

    /// Validity of the plan.
    #[must_use]
    pub const fn status(&self) -> &PlanStatus {
        &self.status
    }

    /// Whether the plan may be applied.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self.status, PlanStatus::Valid)
    }

    /// The failure that discarded this plan, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&PlanFailure> {
        match &self.status {
            PlanStatus::Valid => None,
            PlanStatus::Discarded(failure) => Some(failure),
        }
    }
}
