//! Expand mapping entries into concrete link requests.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Action;
use crate::error::ResolveError;
use crate::resources::symlink::LinkRequest;

/// Trailing marker that turns a target spec into "every file below this directory".
const WILDCARD_SUFFIX: &str = "*";

/// Resolves `(source expression, target spec)` pairs against one dotfiles
/// directory and home directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    dotfiles_dir: PathBuf,
    home: PathBuf,
}

impl Resolver {
    /// Create a resolver rooted at `dotfiles_dir`, expanding `~` to `home`.
    #[must_use]
    pub const fn new(dotfiles_dir: PathBuf, home: PathBuf) -> Self {
        Self { dotfiles_dir, home }
    }

    /// Root of the managed files.
    #[must_use]
    pub fn dotfiles_dir(&self) -> &Path {
        &self.dotfiles_dir
    }

    /// Expand one mapping entry.
    ///
    /// A target spec ending in `/*` is walked recursively and yields one
    /// request per file, with the file's path relative to the wildcard
    /// directory appended to the source. Any other spec must name an existing
    /// file or directory and yields exactly one request.
    ///
    /// An empty result is only possible for an empty wildcard directory.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingWildcardDir`] if a wildcard spec does not name a directory
    /// - [`ResolveError::MissingTarget`] if a plain spec names nothing
    /// - [`ResolveError::Walk`] if walking the wildcard directory fails
    /// - [`ResolveError::Io`] if the target cannot be inspected
    pub fn resolve(
        &self,
        source_expr: &str,
        target_spec: &str,
        action: Action,
    ) -> Result<Vec<LinkRequest>, ResolveError> {
        let source = expand_home(source_expr, &self.home);

        if let Some(dir_spec) = wildcard_dir(target_spec) {
            let dir = self.dotfiles_dir.join(dir_spec);
            return walk_wildcard(&dir, &source, action);
        }

        let target = self.dotfiles_dir.join(target_spec);
        match std::fs::metadata(&target) {
            Ok(_) => Ok(vec![LinkRequest::new(source, target, action)]),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ResolveError::MissingTarget(target)),
            Err(source) => Err(ResolveError::Io {
                path: target,
                source,
            }),
        }
    }
}

/// Expand a leading `~` to `home`. `~user` forms and everything else are
/// taken literally.
#[must_use]
pub fn expand_home(expr: &str, home: &Path) -> PathBuf {
    if expr == "~" {
        return home.to_path_buf();
    }
    match expr
        .strip_prefix("~/")
        .or_else(|| cfg!(windows).then(|| expr.strip_prefix("~\\")).flatten())
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(expr),
    }
}

/// Directory part of a wildcard target spec, or `None` for plain specs.
///
/// `"nvim/*"` → `Some("nvim")`, a bare `"*"` → `Some("")` (the dotfiles root).
fn wildcard_dir(spec: &str) -> Option<&str> {
    let rest = spec.strip_suffix(WILDCARD_SUFFIX)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_suffix('/')
        .or_else(|| cfg!(windows).then(|| rest.strip_suffix('\\')).flatten())
}

fn walk_wildcard(
    dir: &Path,
    source_root: &Path,
    action: Action,
) -> Result<Vec<LinkRequest>, ResolveError> {
    if !dir.is_dir() {
        return Err(ResolveError::MissingWildcardDir(dir.to_path_buf()));
    }

    let mut requests = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ResolveError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        requests.push(LinkRequest::new(
            source_root.join(rel),
            entry.path().to_path_buf(),
            action,
        ));
    }
    Ok(requests)
}
