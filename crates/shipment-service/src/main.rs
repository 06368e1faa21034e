//! Main entry point for the shipment coordinator service.
//!
//! This binary loads the configuration, wires the coordinator to the
//! configured storage backend and serves the HTTP API until interrupted.

use clap::Parser;
use shipment_config::Config;
use std::path::PathBuf;

mod apis;
mod factory_registry;
mod server;

/// Command-line arguments for the shipment coordinator service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/shipment.toml", env = "SHIPMENT_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error); defaults to the configured level
	#[arg(short, long)]
	log_level: Option<String>,
}

/// Main entry point for the shipment coordinator service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Loads configuration from file
/// 3. Initializes logging infrastructure
/// 4. Builds the coordinator with the configured storage
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args
		.log_level
		.clone()
		.unwrap_or_else(|| config.logging.level.clone());
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Loaded configuration [{}]", config.service.id);

	let coordinator = factory_registry::build_coordinator_from_config(config.clone())?;

	let Some(api_config) = config.enabled_api().cloned() else {
		tracing::warn!("API server is disabled, nothing to serve");
		return Ok(());
	};

	tokio::select! {
		result = server::start_server(api_config, coordinator) => {
			tracing::info!("API server finished");
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Shutdown signal received");
		}
	}

	tracing::info!("Stopped shipment coordinator");
	Ok(())
}
