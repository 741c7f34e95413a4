//! Run configuration: where the dotfiles live, which mapping to read, and
//! what to do with it.
pub mod mapping;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name looked up inside the dotfiles directory when `--map-file` is absent.
pub const DEFAULT_MAP_FILE: &str = "dotie_map.toml";

/// Environment variable naming the dotfiles directory.
pub const DOTFILES_ENV: &str = "DOTFILES";

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create links from sources to targets.
    Install,
    /// Remove links previously created by `Install`.
    Uninstall,
}

impl Action {
    /// Lower-case verb, used in log file names and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
        }
    }

    /// The action that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Install => Self::Uninstall,
            Self::Uninstall => Self::Install,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved invocation record consumed by the planning core.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical dotfiles directory.
    pub dotfiles_dir: PathBuf,
    /// Mapping file to load.
    pub map_file: PathBuf,
    /// Home directory that `~` expands to.
    pub home: PathBuf,
    /// Install or uninstall.
    pub action: Action,
    /// Applications to act on; empty means every mapped application.
    pub apps: Vec<String>,
    /// Preview only; never touch the filesystem.
    pub dry_run: bool,
}

impl Settings {
    /// Resolve settings from command-line values and the environment.
    ///
    /// `env` looks up environment variables (normally
    /// `|k| std::env::var(k).ok()`), which keeps discovery testable.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the dotfiles directory is unset or not a
    /// directory, the mapping file is missing, or no home directory is known.
    pub fn resolve(
        dotfiles_dir: Option<&Path>,
        map_file: Option<&Path>,
        action: Action,
        apps: Vec<String>,
        dry_run: bool,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let dotfiles_dir = resolve_dotfiles_dir(dotfiles_dir, &env)?;
        let map_file = resolve_map_file(map_file, &dotfiles_dir)?;
        let home = resolve_home(&env)?;
        Ok(Self {
            dotfiles_dir,
            map_file,
            home,
            action,
            apps,
            dry_run,
        })
    }
}

/// Pick the dotfiles directory from the flag, then `$DOTFILES`, and
/// canonicalise it.
fn resolve_dotfiles_dir(
    flag: Option<&Path>,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, ConfigError> {
    let dir = flag
        .map(Path::to_path_buf)
        .or_else(|| env(DOTFILES_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
        .ok_or(ConfigError::DotfilesDirNotSet)?;
    if !dir.is_dir() {
        return Err(ConfigError::NotADirectory(dir));
    }
    dunce::canonicalize(&dir).map_err(|source| ConfigError::Read { path: dir, source })
}

/// Use the explicit mapping file or fall back to `<dotfiles>/dotie_map.toml`.
fn resolve_map_file(flag: Option<&Path>, dotfiles_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = flag.map_or_else(|| dotfiles_dir.join(DEFAULT_MAP_FILE), Path::to_path_buf);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::MapFileNotFound(path))
    }
}

fn resolve_home(env: &impl Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    let home = if cfg!(target_os = "windows") {
        env("USERPROFILE").or_else(|| env("HOME"))
    } else {
        env("HOME")
    };
    home.filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::HomeNotSet)
}
