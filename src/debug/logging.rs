//! Tracing subscriber setup.
//!
//! The framework only emits `tracing` events: structural edits and property
//! dispatches at `trace`, root attach and dispose at `debug`, edits reaching a
//! disposed root at `warn`. Applications that do not install their own
//! subscriber can call [`install_tracing`].

use std::io::{self, Write};
use std::sync::Once;

use tracing_subscriber::fmt::{self, writer::MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};

const TRACING_PREFIX: &str = "[riverbed]";
const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a global `fmt` subscriber writing to stderr (idempotent).
///
/// The filter is read from `RUST_LOG` and defaults to `info`, so
/// `RUST_LOG=riverbed_core=trace` shows every edit.
pub fn install_tracing() {
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let console = fmt::layer()
            .with_writer(PrefixedWriter)
            .with_ansi(false)
            .with_target(true)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            eprintln!("{TRACING_PREFIX} a global tracing subscriber is already installed");
        }
    });
}

#[derive(Clone, Copy, Default)]
struct PrefixedWriter;

impl<'a> MakeWriter<'a> for PrefixedWriter {
    type Writer = PrefixedWriterInner<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        PrefixedWriterInner {
            inner: io::stderr(),
            wrote_prefix: false,
        }
    }
}

struct PrefixedWriterInner<W> {
    inner: W,
    wrote_prefix: bool,
}

impl<W: Write> Write for PrefixedWriterInner<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_prefix {
            self.inner.write_all(TRACING_PREFIX.as_bytes())?;
            self.inner.write_all(b" ")?;
            self.wrote_prefix = true;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{PrefixedWriterInner, TRACING_PREFIX, install_tracing};

    #[test]
    fn prefix_is_written_once_per_event() {
        let mut writer = PrefixedWriterInner {
            inner: Vec::new(),
            wrote_prefix: false,
        };
        writer.write_all(b"first ").expect("vec writer");
        writer.write_all(b"second").expect("vec writer");
        assert_eq!(
            String::from_utf8(writer.inner).expect("utf-8"),
            format!("{TRACING_PREFIX} first second")
        );
    }

    #[test]
    fn install_is_idempotent() {
        install_tracing();
        install_tracing();
        tracing::debug!("subscriber installed");
    }
}
