use std::io::{self, IsTerminal};

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Level used when neither `RUST_LOG` nor `--verbose` asks for more.
pub const DEFAULT_LEVEL: &str = "warn";

/// Level used with `--verbose`: every intermediate figure is logged.
pub const VERBOSE_LEVEL: &str = "simples_core=debug,simples_data=debug,info";

// --- Formatter ---

/// Local timestamp, coloured level, `file:line`, then the event fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        if ansi {
            write!(writer, "\x1b[2m{timestamp}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} ")?;
        }

        let colour = match *meta.level() {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        };
        if ansi {
            write!(writer, "{colour}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = trim_source_path(file);
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Drops everything up to and including the crate's `src/` directory.
fn trim_source_path(file: &str) -> &str {
    file.rsplit_once("src/")
        .or_else(|| file.rsplit_once("src\\"))
        .map_or(file, |(_, rest)| rest)
}

/// `RUST_LOG` wins when set and valid; otherwise `fallback`.
fn make_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// [`LocalFmt`] output layer writing to `writer`.
fn fmt_layer<S, W>(
    writer: W,
    ansi: bool,
) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(ansi)
        .with_writer(writer)
}

/// Initializes logging to stderr. Call once at startup.
///
/// Stdout stays reserved for the report, so piping the output never mixes
/// in log lines. Colour is used only when stderr is a terminal.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };

    let _ = tracing_subscriber::registry()
        .with(make_filter(fallback))
        .with(fmt_layer(io::stderr, io::stderr().is_terminal()))
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn trim_source_path_strips_crate_prefix() {
        assert_eq!(
            trim_source_path("simples-core/src/calculations/withholding.rs"),
            "calculations/withholding.rs"
        );
    }

    #[test]
    fn trim_source_path_handles_windows_separators() {
        assert_eq!(trim_source_path("simples-core\\src\\lib.rs"), "lib.rs");
    }

    #[test]
    fn trim_source_path_leaves_other_paths_alone() {
        assert_eq!(trim_source_path("build.rs"), "build.rs");
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(ansi: bool) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber =
            tracing_subscriber::registry().with(fmt_layer(move || writer.clone(), ansi));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(row = 3, "salary outside every bracket");
        });

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn fmt_layer_writes_level_location_and_fields() {
        let line = capture(false);

        assert!(line.contains(" WARN "), "{line}");
        assert!(line.contains("logging.rs:"), "{line}");
        assert!(line.contains("salary outside every bracket"), "{line}");
        assert!(line.contains("row=3"), "{line}");
        assert!(!line.contains('\x1b'), "{line}");
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn fmt_layer_colours_level_when_ansi_enabled() {
        let line = capture(true);

        assert!(line.contains("\x1b[1;33m WARN\x1b[0m"), "{line}");
    }

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
