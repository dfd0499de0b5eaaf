use super::{LogLevel, LogTarget};
use std::fmt::{self, Write as _};
use std::io;
use tracing::field::{Field, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Builds the subscriber behind the molio logger.
///
/// A compact `fmt` layer writes through [`SinkWriter`] to the current stdout,
/// stderr or file target, and [`SinkLayer`] filters by level and feeds
/// callback targets.
pub fn subscriber() -> impl Subscriber + Send + Sync + 'static {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(SinkWriter)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry().with(fmt_layer).with(SinkLayer)
}

/// A `tracing` layer applying the level of the global molio logger and
/// forwarding bare messages to callback targets.
///
/// The level check happens for every event, so changing the level of the
/// global logger takes effect immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkLayer;

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        LogLevel::from(metadata.level()) <= super::level()
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let logger = super::logger();
        if matches!(logger.target, LogTarget::Callback(_)) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            logger
                .target
                .forward(LogLevel::from(event.metadata().level()), &visitor.finish());
        }
    }
}

/// A [`MakeWriter`] handing formatted lines to the current global target.
///
/// Each line is written with the logger locked, so lines from concurrent
/// threads never interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkWriter;

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

impl io::Write for SinkWriter {
    // Write failures are dropped, there is nowhere left to report them.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = super::logger().target.write_formatted(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
