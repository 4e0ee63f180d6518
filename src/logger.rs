use once_cell::sync::OnceCell;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initializes tracing output for harness runs.
///
/// `level` is the filter used when `RUST_LOG` is not set. Safe to call from
/// every test; only the first call takes effect.
pub fn init(level: &str) {
    LOGGER_INIT.get_or_init(|| {
        // translate messages from crates still on the log facade
        LogTracer::init().expect("failed to initialise LogTracer");

        let builder = tracing_subscriber::fmt::Subscriber::builder();

        let subscriber = match EnvFilter::try_from_default_env() {
            Ok(filter) => builder.with_env_filter(filter).finish(),
            Err(_) => builder.with_env_filter(level).finish(),
        };

        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set default subscriber");
    });
}
