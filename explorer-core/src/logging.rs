//! src/logging.rs
//!
//! Tracing setup: a daily rolling log file plus stderr, both rendered with
//! one compact sequence-numbered formatter that also prints the span scope,
//! so a scan's log lines carry the `list{path=..}` they belong to.

use std::{
    fs,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, daily},
};
use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext, FormattedFields,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::{config::LoggingConfig, error::AppError};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`.
    ///
    /// The returned guard flushes the file writer on drop, so keep it alive
    /// for the lifetime of the process.
    pub fn init_tracing(cfg: &LoggingConfig) -> Result<WorkerGuard, AppError> {
        // create the log dir if missing
        fs::create_dir_all(&cfg.dir)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        // daily rolling file appender → <dir>/<prefix>.YYYY-MM-DD
        let file: RollingFileAppender = daily(&cfg.dir, &cfg.file_prefix);
        let (file_writer, guard): (NonBlocking, WorkerGuard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(file_writer)
            .with_ansi(false)
            .with_filter(Self::filter(&cfg.level));

        let stderr_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_filter(Self::filter(&cfg.level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("tracing already initialised: {e}")))?;

        Ok(guard)
    }

    /// `RUST_LOG` wins; otherwise the configured level.
    fn filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

/// `SEQ HH:MM:SS.mmm LEVEL [target file:line] span{fields}:span: message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let seq: usize = SEQ
            .get()
            .map_or(0, |counter| counter.fetch_add(1, Ordering::Relaxed));

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{} {}:{}] ",
            Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.target(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
        )?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(w, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(w, "{{{fields}}}")?;
                    }
                }

                w.write_char(':')?;
            }
            w.write_char(' ')?;
        }

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::{info, info_span};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .event_format(SeqFileMod)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, emit);

        String::from_utf8(sink.0.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_line_carries_target_and_span_scope() {
        let out = capture(|| {
            let span = info_span!("list", path = "/srv/data");
            let _entered = span.enter();
            info!(marker = "PERF_DIRECTORY_SCAN", "scan complete");
        });

        assert!(out.contains("INFO"), "{out}");
        assert!(out.contains("[explorer_core::logging::tests"), "{out}");
        assert!(out.contains("list{"), "{out}");
        assert!(out.contains("/srv/data"), "{out}");
        assert!(out.contains("PERF_DIRECTORY_SCAN"), "{out}");
        assert!(out.contains("scan complete"), "{out}");
    }

    #[test]
    fn test_line_without_span_has_no_scope() {
        let out = capture(|| info!("bare event"));

        assert!(out.contains("] bare event"), "{out}");
        assert_eq!(out.lines().count(), 1);
    }
}
