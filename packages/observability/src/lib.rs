//! # Observability
//!
//! Logging setup for the EcoDelicias client.
//!
//! Library crates only *produce* logs through the standard `tracing` macros.
//! Binaries call [`init_with_config`] once at startup; from then on every
//! event is written as one JSON object per line to
//! `~/.ecodelicias/logs/client.jsonl`, and optionally mirrored to stderr in
//! a compact human-readable form.
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         also_stderr: true,
//!         ..Default::default()
//!     });
//!     tracing::info!("ready");
//! }
//! ```

mod json_layer;
mod writer;

use std::path::PathBuf;

pub use json_layer::{JsonLayer, LogEntry};
pub use writer::{LogFileWriter, LogFileWriterFactory};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the emitting program (e.g. "cli").
    /// Included in every log line for filtering.
    pub service_name: String,

    /// Default level filter. `RUST_LOG` takes precedence when set.
    pub default_level: String,

    /// Log file location; `~/.ecodelicias/logs/client.jsonl` when `None`.
    pub log_path: Option<PathBuf>,

    /// Mirror events to stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Default log file location.
///
/// Falls back to the system temp directory when no home directory exists.
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".ecodelicias")
        .join("logs")
        .join("client.jsonl")
}

/// Initialize logging with default settings for the given service.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize logging with custom configuration.
///
/// Installing a global subscriber twice is a no-op: the second call keeps
/// the first subscriber and returns silently. If the log file cannot be
/// opened, logging degrades to stderr only.
pub fn init_with_config(config: LogConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let log_path = config.log_path.clone().unwrap_or_else(default_log_path);
    let level_filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_level))
    };

    let json_layer = match LogFileWriter::open(&log_path) {
        Ok(writer) => Some(
            JsonLayer::new(config.service_name.clone(), LogFileWriterFactory::new(writer))
                .with_filter(level_filter()),
        ),
        Err(e) => {
            eprintln!("failed to open log file {}: {}", log_path.display(), e);
            None
        }
    };

    // Without a file the stderr layer is the only sink left.
    let stderr_enabled = config.also_stderr || json_layer.is_none();
    let stderr_layer = stderr_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(level_filter())
    });

    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            service = %config.service_name,
            log_path = %log_path.display(),
            "observability initialized"
        );
    }
}

/// Re-export tracing macros so callers can use `observability::info!()`.
pub use tracing::{debug, error, info, instrument, trace, warn};
