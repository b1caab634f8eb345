use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/**
 * \brief Install the global tracing subscriber. Safe to call more than once.
 * \param json emit one JSON object per line instead of human-readable output
 */
pub fn init(json: bool) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false);
        let result = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if let Err(err) = result {
            eprintln!("telemetry init failed: {}", err);
        }
    });
}

/**
 * \brief Record a routine event under a category.
 */
pub fn log_event(category: &str, message: &str) {
    tracing::info!(category, "{}", message);
}

/**
 * \brief Record a recoverable failure under a category.
 */
pub fn log_warn(category: &str, message: &str) {
    tracing::warn!(category, "{}", message);
}

/**
 * \brief Record an error event under a category.
 */
pub fn log_error(category: &str, message: &str) {
    tracing::error!(category, "{}", message);
}
