//! Subscriber setup for applications embedding handlefs
//!
//! The library itself only emits `tracing` events. Mutations (rename,
//! reparent, clone, destroy, writes) log at debug; skipped traversal
//! branches log at warn.
//!
//! ```no_run
//! handlefs::util::logging::init_from_env();
//! ```

use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level applied to `handlefs` targets unless `RUST_LOG` is set
    pub level: Level,

    /// Emit one JSON object per event instead of console lines
    pub use_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::with_level(Level::INFO)
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            use_json: false,
        }
    }
}

/// Case-insensitive level name; unknown names fall back to `INFO`
///
/// ```
/// use handlefs::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Warn"), Level::WARN);
/// assert_eq!(parse_level("chatty"), Level::INFO);
/// ```
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

/// `RUST_LOG` wins when present; otherwise only handlefs events at
/// `level` and above pass
fn filter_for(level: Level) -> EnvFilter {
    if env::var_os("RUST_LOG").is_some() {
        return EnvFilter::from_default_env();
    }
    EnvFilter::new(format!("handlefs={}", level))
}

/// Installs a global subscriber. Returns false when one was already set,
/// in which case `config` is ignored.
pub fn init_logging(config: LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(filter_for(config.level));

    let result = if config.use_json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.is_ok()
}

pub fn init_default() -> bool {
    init_logging(LoggingConfig::default())
}

/// Reads `HANDLEFS_LOG_LEVEL` and `HANDLEFS_LOG_JSON`
pub fn init_from_env() -> bool {
    let level = env::var("HANDLEFS_LOG_LEVEL")
        .map(|v| parse_level(&v))
        .unwrap_or(Level::INFO);
    let use_json = env::var("HANDLEFS_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig { level, use_json })
}
