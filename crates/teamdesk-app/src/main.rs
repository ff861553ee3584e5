//! Teamdesk entry point
//!
//! Run with:
//! ```bash
//! ACTING_USER_ID=admin SEED_FILE=./seed.json cargo run -p teamdesk-app
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use teamdesk_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        heartbeat_secs = config.heartbeat.interval_secs,
        export_dir = %config.export.dir.display(),
        "Configuration loaded"
    );

    if let Err(e) = teamdesk_app::run(config).await {
        error!(error = %e, "Session failed");
        std::process::exit(1);
    }
}
