//! Log subscriber assembly.
//!
//! Deprecation notices always reach stderr. With a log file configured, the
//! file gets everything at the configured level while stderr keeps only the
//! notices; without one, stderr gets everything.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

use crate::alias::DEPRECATION_TARGET;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Level filter from a directive string, falling back to `warn` when the
/// string does not parse.
pub fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn fmt_layer<W>(json: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

/// Builds the subscriber: a stderr layer, plus a file layer when `file` is
/// given.
pub fn subscriber<E, F>(
    level: &str,
    json: bool,
    stderr: E,
    file: Option<F>,
) -> impl tracing::Subscriber + Send + Sync
where
    E: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    match file {
        Some(file) => {
            layers.push(
                fmt_layer(json, file)
                    .with_filter(level_filter(level))
                    .boxed(),
            );
            layers.push(
                fmt_layer(json, stderr)
                    .with_filter(EnvFilter::new(format!("{DEPRECATION_TARGET}=warn")))
                    .boxed(),
            );
        }
        None => {
            layers.push(
                fmt_layer(json, stderr)
                    .with_filter(level_filter(level))
                    .boxed(),
            );
        }
    }
    tracing_subscriber::registry().with(layers)
}
