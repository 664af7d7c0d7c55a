//! Subscriber setup for the harness binary.

use crate::config::{LogFormat, LoggingConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter admitting events at `config.level` and above.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::new(config.level.to_string())
}

/// Build a fmt subscriber for `config` writing through `writer`.
pub fn subscriber<W>(config: &LoggingConfig, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer)
        .with_target(false);

    match config.format {
        LogFormat::Json => Box::new(builder.json().finish()),
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` if a subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    tracing::subscriber::set_global_default(subscriber(config, std::io::stderr)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::filter::LevelFilter;

    /// Collects formatted output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Captured;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_filter_follows_configured_level() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
        };
        assert_eq!(env_filter(&config).max_level_hint(), Some(LevelFilter::WARN));

        let verbose = LoggingConfig {
            level: LogLevel::Trace,
            ..config
        };
        assert_eq!(env_filter(&verbose).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_level_drops_quieter_events() {
        let captured = Captured::default();
        let config = LoggingConfig {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
        };

        tracing::subscriber::with_default(subscriber(&config, captured.clone()), || {
            tracing::info!("suite banner");
            tracing::warn!("skipping figures");
        });

        let text = captured.text();
        assert!(text.contains("skipping figures"));
        assert!(!text.contains("suite banner"));
    }

    #[test]
    fn test_json_format_emits_json_lines() {
        let captured = Captured::default();
        let config = LoggingConfig {
            level: LogLevel::Info,
            format: LogFormat::Json,
        };

        tracing::subscriber::with_default(subscriber(&config, captured.clone()), || {
            tracing::info!(rows = 2, "counter table saved");
        });

        let text = captured.text();
        let line = text.lines().next().unwrap();
        assert!(line.starts_with('{') && line.ends_with('}'));
        assert!(line.contains("\"rows\":2"));
    }
}
