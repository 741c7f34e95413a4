//! Top-level subcommands and the setup they share.
pub mod generate;
pub mod install;
pub mod uninstall;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::mapping::Mapping;
use crate::config::{Action, Settings};
use crate::logging::Logger;
use crate::plans::{self, AppReport, Resolver};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates settings discovery and mapping loading so that each command
/// does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved invocation settings.
    pub settings: Settings,
    /// Mapping loaded from [`Settings::map_file`].
    pub mapping: Mapping,
}

impl CommandSetup {
    /// Resolve settings from the command line and process environment, then
    /// load the mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the dotfiles directory, mapping file, or home
    /// directory cannot be determined, or the mapping fails to parse.
    pub fn init(
        global: &GlobalOpts,
        action: Action,
        apps: &[String],
        log: &Logger,
    ) -> Result<Self> {
        let settings = Settings::resolve(
            global.dotfiles_dir.as_deref(),
            global.map_file.as_deref(),
            action,
            apps.to_vec(),
            global.dry_run,
            |key| std::env::var(key).ok(),
        )?;
        Self::from_settings(settings, log)
    }

    /// Load the mapping named by already-resolved settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping file cannot be read or parsed.
    pub fn from_settings(settings: Settings, log: &Logger) -> Result<Self> {
        log.begin_run(version::version(), &settings);

        log.stage("Loading mapping");
        log.debug(&format!("dotfiles: {}", settings.dotfiles_dir.display()));
        log.debug(&format!("home: {}", settings.home.display()));
        let mapping = Mapping::load(&settings.map_file)?;
        log.info(&format!(
            "loaded {} application(s), {} entries from {}",
            mapping.len(),
            mapping.entry_count(),
            settings.map_file.display()
        ));

        Ok(Self { settings, mapping })
    }
}

/// Build and apply every selected application's plan, then print the summary.
///
/// Per-application failures are reported, not returned; use
/// [`ensure_no_failures`] to turn them into an exit status.
///
/// # Errors
///
/// Returns an error for conditions that abort the whole run: an unknown
/// application name or a failed wildcard directory walk. Nothing is applied
/// in that case.
pub fn run_plans_to_completion(setup: &CommandSetup, log: &Logger) -> Result<Vec<AppReport>> {
    let settings = &setup.settings;
    let resolver = Resolver::new(settings.dotfiles_dir.clone(), settings.home.clone());

    let plans = plans::build_plans(
        &setup.mapping,
        &settings.apps,
        &resolver,
        settings.action,
        log,
    )?;
    let reports = plans::apply(&plans, settings.dry_run, log);

    log.print_summary();
    Ok(reports)
}

/// Fail if any application did not end in its desired state.
///
/// # Errors
///
/// Returns an error naming how many applications failed.
pub fn ensure_no_failures(reports: &[AppReport]) -> Result<()> {
    let count = reports.iter().filter(|r| r.is_failure()).count();
    if count > 0 {
        anyhow::bail!("{count} application(s) failed");
    }
    Ok(())
}

/// Shared body of `install` and `uninstall`.
fn run_action(global: &GlobalOpts, action: Action, apps: &[String], log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, action, apps, log)?;
    let reports = run_plans_to_completion(&setup, log)?;
    ensure_no_failures(&reports)
}
