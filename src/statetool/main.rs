use statetool::cli;
use statetool::config::{AppConfig, DEFAULT_LOG_FILTER};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = AppConfig::from_env();
    init_tracing(&config);

    let argv = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    match cli::run(argv, &config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Logs go to stderr so stdout carries only the result line.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
