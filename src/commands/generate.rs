//! Command: generate a mapping template.
use anyhow::Result;

use crate::cli::GenerateOpts;
use crate::error::DotieError;
use crate::logging::Logger;

/// Run the generate command.
///
/// # Errors
///
/// Always returns [`DotieError::NotImplemented`]; nothing is written.
pub fn run(opts: &GenerateOpts, log: &Logger) -> Result<()> {
    log.debug(&format!(
        "generate {} -> {} (fold: {})",
        opts.src.display(),
        opts.dest.display(),
        opts.fold
    ));
    Err(DotieError::NotImplemented("generate").into())
}
