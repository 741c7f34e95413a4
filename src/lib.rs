//! Dotfiles linker.
//!
//! Links configuration files kept in a dotfiles directory into the places
//! applications expect them, driven by a TOML mapping of application name to
//! `target = source` entries. Conflicts are detected before anything is
//! touched, and each application is linked or unlinked as a whole.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: settings discovery and the mapping file model
//! - **[`resources`]**: the symlink primitive with its state check
//! - **[`plans`]**: path resolution, per-application planning, and applying
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `uninstall`, `generate`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod plans;
pub mod resources;
