//! Log subscriber setup for the command line

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an explicit filter, e.g. `zympack_driver=trace`.
pub const LOG_ENV: &str = "ZYMPACK_LOG";

/// Default filter for a `-v` count: warnings only, then info, debug, trace.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `ZYMPACK_LOG` wins over `verbosity`.
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(verbosity > 1);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
