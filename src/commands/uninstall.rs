//! Command: unlink applications.
use anyhow::Result;

use crate::cli::{GlobalOpts, UninstallOpts};
use crate::config::Action;
use crate::logging::Logger;

/// Run the uninstall command.
///
/// Only symlinks that point at the managed files are removed; the files in
/// the dotfiles directory are never touched.
///
/// # Errors
///
/// Returns an error if settings discovery or mapping loading fails, an
/// unknown application is named, or any application could not be unlinked.
pub fn run(global: &GlobalOpts, opts: &UninstallOpts, log: &Logger) -> Result<()> {
    super::run_action(global, Action::Uninstall, &opts.apps, log)
}
