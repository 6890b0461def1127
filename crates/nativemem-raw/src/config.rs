//! Accessor configuration: checking mode and log options.
//!
//! Values come from the environment once, when the native library is
//! loaded. Unknown or missing values keep the defaults.

use std::env;
use std::fmt;

/// Environment variable selecting the [`AccessMode`].
pub const ENV_MODE: &str = "NATIVEMEM_MODE";
/// Environment variable enabling alignment checks in tracked mode.
pub const ENV_CHECK_ALIGNMENT: &str = "NATIVEMEM_CHECK_ALIGNMENT";
/// Environment variable selecting the [`LogLevel`].
pub const ENV_LOG_LEVEL: &str = "NATIVEMEM_LOG_LEVEL";
/// Environment variable selecting the [`LogFormat`].
pub const ENV_LOG_FORMAT: &str = "NATIVEMEM_LOG_FORMAT";

/// Whether heap operations go straight to the allocator or through the
/// tracked heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Direct forwarding, no checks.
    #[default]
    Unchecked,
    /// Allocation registry with bounds, liveness, and double-free checks.
    Tracked,
}

impl AccessMode {
    /// Parse a mode name. Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "unchecked" | "off" | "release" => Some(Self::Unchecked),
            "tracked" | "checked" | "debug" => Some(Self::Tracked),
            _ => None,
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unchecked => "unchecked",
            Self::Tracked => "tracked",
        })
    }
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name. Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Plus lifecycle events.
    Info,
    /// Plus every tracked allocation and free.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Parse a level name. Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "error" | "err" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" | "verbose" => Some(Self::Trace),
            _ => None,
        }
    }

    /// The matching `tracing` level.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        })
    }
}

/// Log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogOptions {
    /// Output format.
    pub format: LogFormat,
    /// Maximum level emitted.
    pub level: LogLevel,
}

/// Configuration for the native memory accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessorConfig {
    /// Checking mode for heap operations.
    pub mode: AccessMode,
    /// Reject misaligned typed accesses in tracked mode.
    pub check_alignment: bool,
    /// Logging options.
    pub log: LogOptions,
}

impl AccessorConfig {
    /// Unchecked mode, no alignment checks, warnings and errors as text.
    pub const DEFAULT: Self = Self {
        mode: AccessMode::Unchecked,
        check_alignment: false,
        log: LogOptions {
            format: LogFormat::Text,
            level: LogLevel::Warn,
        },
    };

    /// Tracked mode with the default log options.
    pub fn tracked() -> Self {
        Self {
            mode: AccessMode::Tracked,
            ..Self::DEFAULT
        }
    }

    /// Read the configuration from `NATIVEMEM_*` environment variables.
    pub fn from_env() -> Self {
        let read = |name: &str| env::var_os(name).map(|v| v.to_string_lossy().into_owned());
        apply_env_overrides(
            Self::DEFAULT,
            EnvOverrides {
                mode: read(ENV_MODE).as_deref(),
                check_alignment: read(ENV_CHECK_ALIGNMENT).as_deref(),
                log_level: read(ENV_LOG_LEVEL).as_deref(),
                log_format: read(ENV_LOG_FORMAT).as_deref(),
            },
        )
    }
}

struct EnvOverrides<'a> {
    mode: Option<&'a str>,
    check_alignment: Option<&'a str>,
    log_level: Option<&'a str>,
    log_format: Option<&'a str>,
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn apply_env_overrides(mut config: AccessorConfig, env: EnvOverrides<'_>) -> AccessorConfig {
    if let Some(mode) = env.mode.and_then(AccessMode::parse) {
        config.mode = mode;
    }
    if let Some(flag) = env.check_alignment.and_then(parse_flag) {
        config.check_alignment = flag;
    }
    if let Some(level) = env.log_level.and_then(LogLevel::parse) {
        config.log.level = level;
    }
    if let Some(format) = env.log_format.and_then(LogFormat::parse) {
        config.log.format = format;
    }
    config
}
