//! Logger initialization.
//!
//! The demo draws on the alternate screen, so log lines written to stderr would
//! tear the frame. `LoggingConfig::log_file` redirects output to a file instead.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "cellglow_core=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Config for a full-screen session: log to `CELLGLOW_LOG_FILE` when set,
    /// otherwise stay silent.
    pub fn for_terminal() -> Self {
        match std::env::var_os("CELLGLOW_LOG_FILE") {
            Some(path) => Self {
                env_filter: None,
                write_style: env_logger::WriteStyle::Never,
                log_file: Some(PathBuf::from(path)),
            },
            None => Self {
                env_filter: Some("off".to_string()),
                ..Self::default()
            },
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. Falls back to `RUST_LOG`, then `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        if let Some(path) = &config.log_file {
            match File::create(path) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(err) => eprintln!("cannot open log file {}: {err}", path.display()),
            }
        }

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
