//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is not set
fn default_directives(level: &str) -> String {
    format!(
        "warn,brana_server={level},shared={level},tower_http={level},http_access={level},security={level}"
    )
}

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON format and daily rolling file output
///
/// `RUST_LOG` overrides `log_level`. Calling it twice is a no-op.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let json = json.unwrap_or(false);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "brana-server");
            let subscriber = subscriber.with_ansi(false).with_writer(file_appender);
            let _ = if json {
                subscriber.json().try_init()
            } else {
                subscriber.try_init()
            };
            return;
        }
        eprintln!("Cannot create log directory {}, logging to stdout", dir);
    }

    let _ = if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let directives = default_directives("debug");
        assert!(directives.contains("brana_server=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
