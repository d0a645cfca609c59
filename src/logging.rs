//! Logging setup.
//!
//! Logs go to stderr so stdout stays clean for results. `RUST_LOG` takes
//! precedence over the level chosen on the command line:
//!
//! ```bash
//! RUST_LOG=memcalc=debug memcalc add 4 4 --save one
//! ```

use std::sync::Once;

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Level used when neither `RUST_LOG` nor a CLI option says otherwise
pub const DEFAULT_LEVEL: &str = "warn";

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Install the global subscriber. Only the first call has an effect.
///
/// `directives` is an `EnvFilter` string such as `"warn"` or
/// `"warn,memcalc::memory=debug"`.
pub fn init(directives: &str) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(directives)
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        // A subscriber installed by an embedding program wins
        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}

/// Check that `directives` would be accepted by [`init`]
pub fn validate_directives(directives: &str) -> Result<(), String> {
    EnvFilter::try_new(directives)
        .map(|_| ())
        .map_err(|err| format!("invalid log level '{directives}': {err}"))
}
