//! Tracing initialization

use tracing_subscriber::{fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,blobthumb=info";

/// Set `LOG_FORMAT=json` for one JSON object per line
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Install the global subscriber. The functions host captures stdout, so
/// timestamps are left to it.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = std::env::var(LOG_FORMAT_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().without_time())
            .init();
    } else {
        let console_fmt = tracing_subscriber::fmt::layer()
            .event_format(Format::default().compact().with_target(false).without_time());
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .init();
    }
}
