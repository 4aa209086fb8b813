//! Tracing initialization for test programs.

use crate::trace_categories;
use std::fmt::Display;
use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Category of runner activity to log.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces assertion evaluation.
    #[clap(name = "assert")]
    Assert,
    /// Traces test execution and timeout supervision.
    #[clap(name = "engine")]
    Engine,
    /// Traces test registration.
    #[clap(name = "registry")]
    Registry,
}

impl TraceEvent {
    /// Every category, in declaration order.
    pub const fn all() -> &'static [Self] {
        &[Self::Assert, Self::Engine, Self::Registry]
    }

    const fn target(self) -> &'static str {
        match self {
            Self::Assert => trace_categories::ASSERT,
            Self::Engine => trace_categories::ENGINE,
            Self::Registry => trace_categories::REGISTRY,
        }
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.target())
    }
}

fn compose_filter(enabled_events: &[TraceEvent]) -> Targets {
    Targets::new()
        .with_default(tracing_subscriber::filter::LevelFilter::WARN)
        .with_targets(
            enabled_events
                .iter()
                .map(|event| (event.target(), tracing::Level::DEBUG)),
        )
}

/// Installs a stderr subscriber with debug logging enabled for the given
/// categories. Warnings from every category are always shown.
pub(crate) fn init(enabled_events: &[TraceEvent]) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(compose_filter(enabled_events));

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
