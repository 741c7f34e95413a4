//! Idempotent link primitives (check + apply pattern).
pub mod helpers;
pub mod symlink;

use anyhow::Result;

use crate::config::Action;

/// Minimal interface for resources that can be described, applied, and removed.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource into existence.
    ///
    /// Implementations create missing parent directories and report
    /// [`LinkOutcome::AlreadySatisfied`] when nothing needed to change.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be made due to I/O failures,
    /// permission issues, or invalid paths.
    fn apply(&self) -> Result<LinkOutcome>;

    /// Undo a previous [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be removed.
    fn remove(&self) -> Result<LinkOutcome>;
}

/// Observed state of the path where a link should live.
///
/// # Examples
///
/// ```
/// use dotie::config::Action;
/// use dotie::resources::{LinkState, Verdict};
///
/// assert_eq!(LinkState::Missing.verdict(Action::Install), Verdict::Ok);
/// assert_eq!(LinkState::Linked.verdict(Action::Install), Verdict::AlreadySatisfied);
/// assert_eq!(LinkState::Linked.verdict(Action::Uninstall), Verdict::Ok);
/// assert!(LinkState::Missing.verdict(Action::Uninstall).is_conflict());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the link path.
    Missing,
    /// The link path is a symlink whose real path is the target.
    Linked,
    /// The link path resolves to the target only through a symlinked ancestor
    /// directory; the path itself is not a link we could remove.
    Covered,
    /// The link path is a dangling symlink.
    Broken {
        /// Where the dangling link points.
        dest: String,
    },
    /// Something unrelated occupies the link path.
    Foreign {
        /// What was found there.
        reason: String,
    },
}

/// Decision for one link request under a given action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Safe to apply.
    Ok,
    /// Already in the desired state; applying is a no-op.
    AlreadySatisfied,
    /// Applying would clobber or remove something that is not the managed link.
    Conflict {
        /// Human-readable explanation.
        reason: String,
    },
}

impl Verdict {
    /// Whether this verdict blocks the owning application.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl LinkState {
    /// Map the observed state to a verdict for `action`.
    ///
    /// Install tolerates anything that already resolves to the target.
    /// Uninstall only accepts a real symlink to the target, so a file that is
    /// not the managed link is never removed.
    #[must_use]
    pub fn verdict(&self, action: Action) -> Verdict {
        match (action, self) {
            (Action::Install, Self::Missing) | (Action::Uninstall, Self::Linked) => Verdict::Ok,
            (Action::Install, Self::Linked | Self::Covered) => Verdict::AlreadySatisfied,
            (_, Self::Foreign { reason }) => Verdict::Conflict {
                reason: reason.clone(),
            },
            (_, Self::Broken { dest }) => Verdict::Conflict {
                reason: format!("dangling symlink to {dest}"),
            },
            (Action::Uninstall, Self::Missing) => Verdict::Conflict {
                reason: "nothing is linked here".to_string(),
            },
            (Action::Uninstall, Self::Covered) => Verdict::Conflict {
                reason: "resolves through a linked parent directory, not a managed link"
                    .to_string(),
            },
        }
    }
}

/// Result of applying one link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A symlink was created.
    Created,
    /// A symlink was removed.
    Removed,
    /// Nothing to do.
    AlreadySatisfied,
    /// Not applied because something else occupies the path.
    SkippedDueToConflict,
}

impl LinkOutcome {
    /// Short label used in logs and summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Removed => "removed",
            Self::AlreadySatisfied => "already linked",
            Self::SkippedDueToConflict => "skipped (conflict)",
        }
    }
}

/// Resources that can report their own state.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined due to I/O failures.
    fn current_state(&self) -> Result<LinkState>;

    /// Decide whether `action` may proceed for this resource.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn check(&self, action: Action) -> Result<Verdict> {
        Ok(self.current_state()?.verdict(action))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    struct TestResource {
        state: LinkState,
    }

    impl Applicable for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn apply(&self) -> Result<LinkOutcome> {
            Ok(LinkOutcome::Created)
        }

        fn remove(&self) -> Result<LinkOutcome> {
            Ok(LinkOutcome::Removed)
        }
    }

    impl Resource for TestResource {
        fn current_state(&self) -> Result<LinkState> {
            Ok(self.state.clone())
        }
    }

    #[test]
    fn install_over_missing_is_ok() {
        let r = TestResource {
            state: LinkState::Missing,
        };
        assert_eq!(r.check(Action::Install).unwrap(), Verdict::Ok);
    }

    #[test]
    fn install_over_covered_is_already_satisfied() {
        let r = TestResource {
            state: LinkState::Covered,
        };
        assert_eq!(r.check(Action::Install).unwrap(), Verdict::AlreadySatisfied);
    }

    #[test]
    fn install_over_foreign_file_conflicts() {
        let r = TestResource {
            state: LinkState::Foreign {
                reason: "is a regular file".to_string(),
            },
        };
        let verdict = r.check(Action::Install).unwrap();
        assert_eq!(
            verdict,
            Verdict::Conflict {
                reason: "is a regular file".to_string()
            }
        );
    }

    #[test]
    fn install_over_broken_link_conflicts() {
        let r = TestResource {
            state: LinkState::Broken {
                dest: "/gone".to_string(),
            },
        };
        let verdict = r.check(Action::Install).unwrap();
        assert!(verdict.is_conflict());
    }

    #[test]
    fn uninstall_requires_real_link() {
        for state in [
            LinkState::Missing,
            LinkState::Covered,
            LinkState::Broken {
                dest: "/gone".to_string(),
            },
            LinkState::Foreign {
                reason: "links to /elsewhere".to_string(),
            },
        ] {
            assert!(
                state.verdict(Action::Uninstall).is_conflict(),
                "{state:?} should block uninstall"
            );
        }
        assert_eq!(LinkState::Linked.verdict(Action::Uninstall), Verdict::Ok);
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(LinkOutcome::Created.label(), "created");
        assert_eq!(LinkOutcome::SkippedDueToConflict.label(), "skipped (conflict)");
    }
}
