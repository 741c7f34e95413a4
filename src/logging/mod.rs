//! Logging infrastructure for structured console and file output.

mod console;
mod event;
mod file;
mod logger;
mod memory;
mod types;

pub use console::init_subscriber;
pub use logger::Logger;
pub use memory::{MemoryLog, Record};
pub use types::{AppEntry, AppStatus, Log};

/// Create a Logger backed by an isolated per-thread tracing subscriber with
/// a [`FileLayer`](file::FileLayer) writing into a temp directory.
///
/// Returns a [`tracing::dispatcher::DefaultGuard`] that must be kept alive
/// for the duration of the test; dropping it restores the previous
/// thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = file::FileLayer::open(&path).expect("failed to create file layer");
    let log = Logger::with_log_file(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}
