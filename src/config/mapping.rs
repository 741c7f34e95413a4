//! Mapping file model: application → ordered `target = source` entries.
//!
//! The mapping is read once per run from a TOML file shaped like:
//!
//! ```toml
//! [vim]
//! ".vimrc" = "~/.vimrc"
//!
//! [nvim]
//! "nvim/*" = "~/.config/nvim"
//! ```
//!
//! Keys inside an application table are target specs relative to the
//! dotfiles directory; values are source expressions naming where the link
//! is created. Document order is preserved for both levels.
use std::path::Path;

use crate::error::{ConfigError, DotieError};

/// One `target = source` line of an application table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Target spec relative to the dotfiles directory (may end in `/*`).
    pub target: String,
    /// Source expression (may start with `~`).
    pub source: String,
}

/// A named application and its entries in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    /// Application name (the TOML table name).
    pub name: String,
    /// Entries in the order they appear in the file.
    pub entries: Vec<Entry>,
}

/// The loaded mapping. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    apps: Vec<App>,
}

impl Mapping {
    /// Read and parse the mapping file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or any of the
    /// parse/shape errors from [`Mapping::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse mapping content. `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML, and
    /// [`ConfigError::MalformedApp`], [`ConfigError::MalformedEntry`] or
    /// [`ConfigError::EmptyEntry`] when the document has the wrong shape.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        Self::from_table(table)
    }

    /// Build a mapping from an already-parsed TOML table.
    ///
    /// # Errors
    ///
    /// Returns a shape error if an application is not a table, an entry is
    /// not a string, or an entry is empty.
    pub fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        let mut apps = Vec::with_capacity(table.len());
        for (name, value) in table {
            let entries = match value {
                toml::Value::Table(entries) => entries,
                other => {
                    return Err(ConfigError::MalformedApp {
                        app: name,
                        found: other.type_str(),
                    });
                }
            };

            let mut app = App {
                name,
                entries: Vec::with_capacity(entries.len()),
            };
            for (target, value) in entries {
                let source = match value {
                    toml::Value::String(source) => source,
                    other => {
                        return Err(ConfigError::MalformedEntry {
                            app: app.name,
                            target,
                            found: other.type_str(),
                        });
                    }
                };
                if target.trim().is_empty() || source.trim().is_empty() {
                    return Err(ConfigError::EmptyEntry {
                        app: app.name,
                        target,
                    });
                }
                app.entries.push(Entry { target, source });
            }
            apps.push(app);
        }
        Ok(Self { apps })
    }

    /// Look up an application by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&App> {
        self.apps.iter().find(|app| app.name == name)
    }

    /// All applications in document order.
    #[must_use]
    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    /// Number of applications.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether the mapping defines no applications.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Total number of entries across all applications.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.apps.iter().map(|app| app.entries.len()).sum()
    }

    /// Pick the applications to act on.
    ///
    /// An empty `names` slice selects every application in mapping order;
    /// otherwise the caller's order is kept and repeated names collapse to
    /// their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`DotieError::UnknownApp`] for the first name the mapping does
    /// not define.
    pub fn select(&self, names: &[String]) -> Result<Vec<&App>, DotieError> {
        if names.is_empty() {
            return Ok(self.apps.iter().collect());
        }
        let mut selected: Vec<&App> = Vec::with_capacity(names.len());
        for name in names {
            let app = self
                .get(name)
                .ok_or_else(|| DotieError::UnknownApp(name.clone()))?;
            if !selected.iter().any(|a| a.name == app.name) {
                selected.push(app);
            }
        }
        Ok(selected)
    }
}
