//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles linker.
#[derive(Parser, Debug)]
#[command(
    name = "dotie",
    about = "Link and unlink dotfiles from a declarative TOML mapping",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Print debug output on the console
    #[arg(long, global = true)]
    pub debug: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// Whether debug output should reach the console.
    ///
    /// Dry runs are verbose so every planned link is visible.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.debug || self.global.dry_run
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Don't make any changes to disk, just pretend
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Dotfiles directory (defaults to $DOTFILES)
    #[arg(long, global = true, value_name = "DIR")]
    pub dotfiles_dir: Option<PathBuf>,

    /// Mapping file (defaults to <dotfiles-dir>/dotie_map.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub map_file: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link the dotfiles of the given applications
    Install(InstallOpts),
    /// Remove the links of the given applications
    Uninstall(UninstallOpts),
    /// Generate a mapping template for a directory
    Generate(GenerateOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::Generate(_) => "generate",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Applications to install (all when omitted)
    #[arg(value_name = "APP")]
    pub apps: Vec<String>,
}

/// Options for the `uninstall` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct UninstallOpts {
    /// Applications to uninstall (all when omitted)
    #[arg(value_name = "APP")]
    pub apps: Vec<String>,
}

/// Options for the `generate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GenerateOpts {
    /// Application path inside the dotfiles directory
    pub src: PathBuf,

    /// Link location
    pub dest: PathBuf,

    /// Emit wildcard (`/*`) entries for directories
    #[arg(long)]
    pub fold: bool,
}
