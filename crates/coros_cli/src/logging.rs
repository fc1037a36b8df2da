use tracing_subscriber::EnvFilter;

/// Per-target overrides appended to the user filter to keep HTTP internals quiet.
const QUIET_TARGETS: &str = "reqwest=warn,hyper_util=warn";

/// Resolve the base log level: `--verbose`, then `COROS_LOG_LEVEL`, then
/// `RUST_LOG`, default `warn` so the table output stays clean.
pub fn log_level(verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    std::env::var("COROS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

pub fn env_filter(log_env: &str) -> EnvFilter {
    let combined_filter = format!("{log_env},{QUIET_TARGETS}");
    EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{QUIET_TARGETS}")))
}

pub fn init(verbose: bool) {
    let log_env = log_level(verbose);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter(&log_env))
        .init();
    tracing::debug!("log filter: {}", log_env);
}
