//! Domain-specific error types for the dotfiles linker.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`ResolveError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotieError
//! ├── Config(ConfigError)   — settings discovery, mapping file parsing
//! ├── UnknownApp            — app named on the command line but not mapped
//! ├── Walk                  — wildcard directory walk failed mid-way
//! └── NotImplemented        — reserved subcommands (generate)
//!
//! ResolveError              — scoped to one application, never fatal
//!                             except for the Walk variant
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level fatal error. Any of these stops the whole run.
#[derive(Error, Debug)]
pub enum DotieError {
    /// Configuration-related error (settings, mapping file).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The user asked for an application that the mapping does not define.
    #[error("Unknown application '{0}': not present in the mapping file")]
    UnknownApp(String),

    /// Walking a wildcard target directory failed.
    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// The requested feature exists on the command line only.
    #[error("'{0}' is not yet implemented")]
    NotImplemented(&'static str),
}

/// Errors that arise from settings discovery and mapping file loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `--dotfiles-dir` nor `$DOTFILES` was provided.
    #[error(
        "Dotfiles dir not found: pass --dotfiles-dir <DIR> or set the DOTFILES environment variable"
    )]
    DotfilesDirNotSet,

    /// The dotfiles directory does not exist or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The mapping file is missing.
    #[error("Map file not found: {} (pass --map-file <FILE> or create dotie_map.toml)", .0.display())]
    MapFileNotFound(PathBuf),

    /// No home directory could be determined.
    #[error("HOME environment variable is not set")]
    HomeNotSet,

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading {}: {source}", .path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mapping file is not valid TOML.
    #[error("Reading {} failed: {message}", .path.display())]
    Parse {
        /// Path to the mapping file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A top-level key in the mapping is not a table of entries.
    #[error("Application '{app}' must be a table of target = source entries, found {found}")]
    MalformedApp {
        /// Application name.
        app: String,
        /// TOML type that was found instead.
        found: &'static str,
    },

    /// An entry value is not a string source expression.
    #[error("Entry '{target}' in '{app}' must map to a string, found {found}")]
    MalformedEntry {
        /// Application name.
        app: String,
        /// Target spec of the offending entry.
        target: String,
        /// TOML type that was found instead.
        found: &'static str,
    },

    /// An entry has an empty target spec or source expression.
    #[error("Entry '{target}' in '{app}' has an empty target or source")]
    EmptyEntry {
        /// Application name.
        app: String,
        /// Target spec of the offending entry.
        target: String,
    },
}

/// Errors produced while expanding one mapping entry into link requests.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A non-wildcard target does not exist in the dotfiles directory.
    #[error("target does not exist: {}", .0.display())]
    MissingTarget(PathBuf),

    /// A wildcard target names a directory that does not exist.
    #[error("wildcard target is not a directory: {}", .0.display())]
    MissingWildcardDir(PathBuf),

    /// The directory walk behind a wildcard target failed.
    #[error("walking {}: {source}", .path.display())]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// Reading filesystem state for a resolved pair failed.
    #[error("reading {}: {source}", .path.display())]
    Io {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Split fatal errors out of the scoped ones.
    ///
    /// Returns `Err` with the run-aborting [`DotieError`] for walk failures and
    /// `Ok(self)` for everything that only discards the owning application.
    ///
    /// # Errors
    ///
    /// Returns [`DotieError::Walk`] when the error is a directory-walk failure.
    pub fn escalate(self) -> Result<Self, DotieError> {
        match self {
            Self::Walk { path, source } => Err(DotieError::Walk { path, source }),
            other => Ok(other),
        }
    }
}
