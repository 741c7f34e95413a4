//! Command: print version information.

/// Version string baked in by `build.rs`, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTIE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dotie version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotie {}", version());
}
