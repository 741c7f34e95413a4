//! Console output and subscriber initialisation.
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::event::{Fields, Kind};
use super::file::{FileLayer, log_file_path};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const GREY: &str = "\x1b[37m";

/// Color of a summary line for an application `status`.
fn status_color(status: &str) -> &'static str {
    match status {
        "ok" => GREEN,
        "failed" => RED,
        _ => GREY,
    }
}

/// Render one event for the terminal, without the trailing newline.
pub(super) fn console_line(kind: Kind, fields: &Fields) -> String {
    let msg = &fields.message;
    match kind {
        Kind::Run => {
            let dry_run = if fields.dry_run {
                format!(" {YELLOW}(dry run){RESET}")
            } else {
                String::new()
            };
            format!(
                "{BOLD}dotie {}{RESET} {msg} {} from {DIM}{}{RESET}{dry_run}",
                fields.version, fields.apps, fields.map
            )
        }
        Kind::Stage => format!("\x1b[1;34m==>{RESET} {BOLD}{msg}{RESET}"),
        Kind::DryRun => format!("  {YELLOW}[DRY RUN]{RESET} {msg}"),
        Kind::Summary => match &fields.status {
            Some(status) => format!("  {}{msg}{RESET}", status_color(status)),
            None => format!("  {BOLD}{msg}{RESET}"),
        },
        Kind::Error => format!("{RED}ERROR{RESET} {msg}"),
        Kind::Warn => format!("{YELLOW}WARN{RESET}  {msg}"),
        Kind::Info => format!("  {msg}"),
        Kind::Debug => format!("  {DIM}{msg}{RESET}"),
    }
}

/// Console [`FormatEvent`] for dotie runs.
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", console_line(Kind::of(event), &Fields::of(event)))
    }
}

/// Install the global subscriber for `command`.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose`. Every event, debug included, is
/// also appended to `$XDG_CACHE_HOME/dotie/<command>.log`. Call once, before
/// anything is logged.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));
    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file = log_file_path(command)
        .and_then(|path| FileLayer::open(&path))
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
