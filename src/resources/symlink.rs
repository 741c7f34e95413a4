//! Symlink resource: one resolved `(source, target)` pair.
//!
//! Naming follows the mapping file: the *target* is the managed file inside
//! the dotfiles directory, the *source* is where the application expects it
//! (usually under `$HOME`). Installing creates a symlink at the source that
//! points to the target.
use anyhow::{Context as _, Result};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::helpers::fs::{create_symlink, ensure_parent_dir, real_path, remove_symlink};
use super::{Applicable, LinkOutcome, LinkState, Resource};
use crate::config::Action;

/// A resolved unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    /// Absolute path where the link lives.
    pub source: PathBuf,
    /// Absolute path of the managed file the link points to.
    pub target: PathBuf,
    /// What to do with the pair.
    pub action: Action,
}

impl LinkRequest {
    /// Create a new link request.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, action: Action) -> Self {
        Self {
            source,
            target,
            action,
        }
    }

    /// The request that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::new(
            self.source.clone(),
            self.target.clone(),
            self.action.inverse(),
        )
    }

    /// Apply or remove according to [`LinkRequest::action`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Applicable::apply`] / [`Applicable::remove`].
    pub fn execute(&self) -> Result<LinkOutcome> {
        match self.action {
            Action::Install => self.apply(),
            Action::Uninstall => self.remove(),
        }
    }
}

impl Applicable for LinkRequest {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn apply(&self) -> Result<LinkOutcome> {
        match self.current_state()? {
            LinkState::Missing => {}
            LinkState::Linked | LinkState::Covered => return Ok(LinkOutcome::AlreadySatisfied),
            LinkState::Broken { .. } | LinkState::Foreign { .. } => {
                return Ok(LinkOutcome::SkippedDueToConflict);
            }
        }

        ensure_parent_dir(&self.source)?;
        create_symlink(&self.target, &self.source)
            .with_context(|| format!("create link: {}", self.source.display()))?;
        Ok(LinkOutcome::Created)
    }

    fn remove(&self) -> Result<LinkOutcome> {
        if self.current_state()? != LinkState::Linked {
            return Ok(LinkOutcome::SkippedDueToConflict);
        }
        remove_symlink(&self.source)
            .with_context(|| format!("remove link: {}", self.source.display()))?;
        Ok(LinkOutcome::Removed)
    }
}

impl Resource for LinkRequest {
    fn current_state(&self) -> Result<LinkState> {
        let meta = match std::fs::symlink_metadata(&self.source) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LinkState::Missing),
            Err(e) => {
                return Err(e).with_context(|| format!("inspect {}", self.source.display()));
            }
        };
        let target_real = real_path(&self.target)
            .with_context(|| format!("resolve target {}", self.target.display()))?;

        match real_path(&self.source) {
            Ok(source_real) if source_real == target_real => Ok(if meta.is_symlink() {
                LinkState::Linked
            } else {
                LinkState::Covered
            }),
            Ok(source_real) => {
                let reason = if meta.is_symlink() {
                    format!("links to {}", source_real.display())
                } else if meta.is_dir() {
                    "a directory is in the way".to_string()
                } else {
                    "a regular file is in the way".to_string()
                };
                Ok(LinkState::Foreign { reason })
            }
            Err(_) if meta.is_symlink() => {
                let dest = std::fs::read_link(&self.source)
                    .map_or_else(|_| "?".to_string(), |p| p.display().to_string());
                Ok(LinkState::Broken { dest })
            }
            Err(e) => Err(e).with_context(|| format!("resolve {}", self.source.display())),
        }
    }
}
