// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository plus a fake home
// directory, and a fluent builder so each integration test can set up an
// isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dotie::commands::{self, CommandSetup};
use dotie::config::{Action, DEFAULT_MAP_FILE, Settings};
use dotie::logging::Logger;
use dotie::plans::AppReport;

/// An isolated dotfiles repository and home directory backed by a
/// [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct IntegrationTestContext {
    /// Temporary directory holding both trees.
    pub root: tempfile::TempDir,
    /// Canonical dotfiles directory.
    pub dotfiles: PathBuf,
    /// Fake home directory that `~` expands to.
    pub home: PathBuf,
}

impl IntegrationTestContext {
    /// Create empty `dotfiles/` and `home/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let base = dunce::canonicalize(root.path()).expect("canonicalize temp dir");
        let dotfiles = base.join("dotfiles");
        let home = base.join("home");
        std::fs::create_dir_all(&dotfiles).expect("create dotfiles dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self {
            root,
            dotfiles,
            home,
        }
    }

    /// Path of `rel` inside the fake home.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Path of `rel` inside the dotfiles directory.
    pub fn dotfiles_path(&self, rel: &str) -> PathBuf {
        self.dotfiles.join(rel)
    }

    /// Resolve settings the way the CLI does, with `$DOTFILES` and `$HOME`
    /// pointing into this context instead of the real environment.
    pub fn settings(&self, action: Action, apps: &[&str], dry_run: bool) -> Settings {
        let env: HashMap<&str, String> = HashMap::from([
            ("DOTFILES", self.dotfiles.display().to_string()),
            ("HOME", self.home.display().to_string()),
            ("USERPROFILE", self.home.display().to_string()),
        ]);
        Settings::resolve(
            None,
            None,
            action,
            apps.iter().map(ToString::to_string).collect(),
            dry_run,
            |key| env.get(key).cloned(),
        )
        .expect("resolve settings")
    }

    /// Run a full install or uninstall and return the per-application
    /// reports alongside the logger that recorded the summary.
    pub fn run(
        &self,
        action: Action,
        apps: &[&str],
        dry_run: bool,
    ) -> (anyhow::Result<Vec<AppReport>>, Logger) {
        let log = Logger::with_log_file(None);
        let result = CommandSetup::from_settings(self.settings(action, apps, dry_run), &log)
            .and_then(|setup| commands::run_plans_to_completion(&setup, &log));
        (result, log)
    }

    /// [`run`](Self::run) that must not hit a fatal error.
    pub fn run_ok(&self, action: Action, apps: &[&str], dry_run: bool) -> Vec<AppReport> {
        self.run(action, apps, dry_run).0.expect("run should not abort")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to lay out managed files, pre-existing home
/// contents, and the mapping before the context is finalised.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` as the default mapping file (`dotie_map.toml`).
    pub fn with_mapping(self, content: &str) -> Self {
        std::fs::write(self.ctx.dotfiles.join(DEFAULT_MAP_FILE), content)
            .expect("write mapping file");
        self
    }

    /// Create a managed file inside the dotfiles directory.
    pub fn with_managed_file(self, rel: &str) -> Self {
        write_file(&self.ctx.dotfiles.join(rel), rel);
        self
    }

    /// Create a regular file in the fake home, e.g. to provoke a conflict.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.home.join(rel), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
