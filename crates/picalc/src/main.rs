//! PiCalc-rs — concurrent pi approximation via fan-out/fan-in partial sums.

use picalc_lib::{app, config, errors};

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // Parse CLI args and run
    let config = config::AppConfig::parse();
    if let Err(e) = app::run(&config) {
        eprintln!("Error: {e}");
        std::process::exit(errors::handle_error(&e));
    }
}
