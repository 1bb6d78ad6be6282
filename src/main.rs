//! ViconShuttle - Vicon-bounded back-and-forth controller
//!
//! Listens for the Vicon Tracker UDP object stream, latches the tracked body's
//! first pose as home and commands the vehicle to reverse whenever its
//! relative X leaves the configured box.
//!
//! ## Usage
//!
//! ```bash
//! vicon-shuttle [config.toml] [--bind 0.0.0.0:51001] [--body CF01]
//! ```
//!
//! Without a config path, `vicon-shuttle.toml` is used when present,
//! otherwise built-in defaults. The actuator is a dry-run logger.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;
use vicon_shuttle::{
    LoggingActuator, Result, ShuttleConfig, ShuttleController, ShuttleError, TrackerState,
    UdpIngest, ensure_ready, wait_for_home,
};

const DEFAULT_CONFIG_PATH: &str = "vicon-shuttle.toml";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = load_config(&args)?;

    // Initialize logging
    let default_directive = format!("vicon_shuttle={}", config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
        )
        .init();

    info!("ViconShuttle v{}", env!("CARGO_PKG_VERSION"));
    let tracked = if config.tracking.body_name.is_empty() {
        "<first item>"
    } else {
        config.tracking.body_name.as_str()
    };
    info!(
        "Tracking '{}' on {} ({:?} decoding)",
        tracked,
        config.bind_address(),
        config.decode_mode()
    );
    info!(
        "Box limit: {:.3} × {} = ±{:.3} pose units",
        config.controller.box_limit,
        config.controller.limit_to_pose_units,
        config.pose_limit()
    );

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| ShuttleError::Config(format!("Error setting Ctrl-C handler: {}", e)))?;

    let mut ingest = UdpIngest::bind(
        &config.bind_address(),
        config.poll_timeout(),
        config.decode_mode(),
    )?;
    let mut state = TrackerState::new(config.tracking.body_name.clone());
    let mut actuator = LoggingActuator::new();

    ensure_ready(&mut actuator, config.ready_timeout())?;

    if !wait_for_home(&mut ingest, &mut state, config.home_timeout(), &running)? {
        info!("Shutdown before Vicon connected");
        return Ok(());
    }

    let mut controller = ShuttleController::from_config(&config);
    controller.run(&mut ingest, &mut state, &mut actuator, &running)?;

    info!(
        "ViconShuttle finished: {} poses ingested, {} bodies seen",
        state.store().object_count(),
        state.store().len()
    );
    Ok(())
}

/// Resolve configuration from arguments, the default file or built-ins.
///
/// Runs before tracing is installed, so failures surface only through the
/// returned error.
fn load_config(args: &[String]) -> Result<ShuttleConfig> {
    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        ShuttleConfig::load(Path::new(&args[1]))?
    } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
        ShuttleConfig::load(Path::new(DEFAULT_CONFIG_PATH))?
    } else {
        ShuttleConfig::default()
    };

    if let Some(bind) = flag_value(args, "--bind") {
        let addr: std::net::SocketAddr = bind
            .parse()
            .map_err(|e| ShuttleError::Config(format!("Invalid bind address: {}", e)))?;
        config.network.bind_ip = addr.ip().to_string();
        config.network.port = addr.port();
    }

    if let Some(body) = flag_value(args, "--body") {
        config.tracking.body_name = body;
    }

    Ok(config)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let err = load_config(&args(&["vicon-shuttle", "/nonexistent/vicon.toml"])).unwrap_err();
        assert!(matches!(err, ShuttleError::Config(_)));
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_flag_overrides() {
        let config = load_config(&args(&[
            "vicon-shuttle",
            "--bind",
            "127.0.0.1:52000",
            "--body",
            "CF01",
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:52000");
        assert_eq!(config.tracking.body_name, "CF01");
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let err = load_config(&args(&["vicon-shuttle", "--bind", "not-an-address"])).unwrap_err();
        assert!(matches!(err, ShuttleError::Config(_)));
    }
}
