use clap::Parser;

/// Entry point for the scope reaper daemon.
///
/// Parses the command line, initializes logging and runs cleanup passes until
/// terminated.
///
/// # Examples
///
/// ```bash
/// scope-reaper --verbose --check-interval 5m
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = scope_reaper::Config::parse();
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();
    scope_reaper::run(config).await
}
