// Environment detection and tracing setup.

use std::sync::OnceLock;

static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

impl EnvMode {
    /// Parse a mode name; anything unrecognised is development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => EnvMode::Production,
            "test" | "testing" => EnvMode::Test,
            _ => EnvMode::Development,
        }
    }
}

/// Detect the environment mode from `GATEHOUSE_ENV`, falling back to
/// `RUST_ENV`. Cached after the first call.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let value = std::env::var("GATEHOUSE_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        EnvMode::parse(&value)
    })
}

/// Whether the process runs in production mode.
pub fn is_production() -> bool {
    detect_env_mode() == EnvMode::Production
}

/// Default `tracing` filter for the given mode.
pub fn default_filter(mode: EnvMode) -> &'static str {
    match mode {
        EnvMode::Production => "gatehouse=info",
        EnvMode::Development | EnvMode::Test => "gatehouse=debug",
    }
}

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// mode-based default. Safe to call more than once.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(detect_env_mode())));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();
}
