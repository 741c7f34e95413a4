//! The per-command log file under the user's cache directory.
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::Context;

use super::event::{Fields, Kind};

const RULE: &str = "==========================================";

/// `$XDG_CACHE_HOME/dotie/<command>.log`, falling back to `~/.cache`.
///
/// Creates the directory; `None` when that fails.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    let dir = cache.join("dotie");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Render one event as log file text, without the trailing newline.
///
/// A run event becomes a header block naming the action, the selection and
/// the mapping file; everything else is a single timestamped line.
pub(super) fn file_line(kind: Kind, fields: &Fields, now: chrono::DateTime<chrono::Utc>) -> String {
    let msg = &fields.message;
    if kind == Kind::Run {
        let dry_run = if fields.dry_run { " (dry run)" } else { "" };
        return format!(
            "{RULE}\ndotie {} {msg}{dry_run} {}\nmap:  {}\napps: {}\n{RULE}",
            fields.version,
            now.format("%Y-%m-%d %H:%M:%S"),
            fields.map,
            fields.apps,
        );
    }

    let time = now.format("%H:%M:%S");
    let tag = match kind {
        Kind::Stage => return format!("[{time}] ==> {msg}"),
        Kind::DryRun => "[dry run] ",
        Kind::Summary => "[summary] ",
        Kind::Error => "[error] ",
        Kind::Warn => "[warn] ",
        Kind::Debug => "[debug] ",
        Kind::Info | Kind::Run => "",
    };
    format!("[{time}]     {tag}{msg}")
}

/// A [`tracing_subscriber::Layer`] appending every event to the log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Truncate `path` and return a layer writing to it; `None` if the file
    /// cannot be created.
    pub(super) fn open(path: &Path) -> Option<Self> {
        let file = File::create(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let line = file_line(Kind::of(event), &Fields::of(event), chrono::Utc::now());
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}
