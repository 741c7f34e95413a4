//! Command: link applications.
use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::Action;
use crate::logging::Logger;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if settings discovery or mapping loading fails, an
/// unknown application is named, or any application could not be linked.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Logger) -> Result<()> {
    super::run_action(global, Action::Install, &opts.apps, log)
}
