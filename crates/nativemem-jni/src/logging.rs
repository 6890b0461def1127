//! Global `tracing` subscriber for the loaded library.

use std::io::IsTerminal;
use std::sync::OnceLock;

use nativemem_raw::{LogFormat, LogOptions};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Variable holding `EnvFilter` directives; overrides the configured level.
pub const ENV_FILTER: &str = "NATIVEMEM_LOG";

fn make_filter(options: &LogOptions) -> EnvFilter {
    let default = LevelFilter::from_level(options.level.as_tracing_level());
    EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(ENV_FILTER)
        .from_env_lossy()
}

/// Install the stderr subscriber once. Later calls, and hosts that already
/// installed a global subscriber, are left alone.
pub fn init_logging(options: &LogOptions) {
    static INITIALISED: OnceLock<()> = OnceLock::new();

    let _ = INITIALISED.get_or_init(|| {
        let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

        match options.format {
            LogFormat::Json => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter(options))
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .json()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
            LogFormat::Text => {
                let subscriber = fmt::fmt()
                    .with_env_filter(make_filter(options))
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .compact()
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativemem_raw::LogLevel;

    #[test]
    fn init_is_idempotent() {
        let options = LogOptions {
            format: LogFormat::Text,
            level: LogLevel::Debug,
        };
        init_logging(&options);
        init_logging(&LogOptions::default());
        tracing::debug!("logging initialised twice without panicking");
    }
}
