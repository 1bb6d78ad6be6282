//! Synthetic Vicon object stream.
//!
//! Sends one rigid body oscillating along X so the shuttle controller can be
//! exercised without a capture system.
//!
//! # Usage
//!
//! ```bash
//! vicon-sim
//! vicon-sim 127.0.0.1:51001 --body CF01 --rate 100 --amplitude 20 --period 4
//! ```

use std::env;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

use tracing::info;
use vicon_shuttle::{BodyPose, FrameEncoder};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vicon_sim=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct Config {
    target: String,
    body: String,
    /// Frames per second
    rate_hz: f64,
    /// Peak X displacement (mm)
    amplitude_mm: f64,
    /// Oscillation period (s)
    period_s: f64,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut config = Config {
        target: "127.0.0.1:51001".to_string(),
        body: "RIGID01".to_string(),
        rate_hz: 100.0,
        amplitude_mm: 20.0,
        period_s: 4.0,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--body" => config.body = next_value(args, &mut i)?,
            "--rate" => config.rate_hz = parse_number(&next_value(args, &mut i)?)?,
            "--amplitude" => config.amplitude_mm = parse_number(&next_value(args, &mut i)?)?,
            "--period" => config.period_s = parse_number(&next_value(args, &mut i)?)?,
            "--help" | "-h" => return Err("Help requested".to_string()),
            arg if !arg.starts_with('-') => config.target = arg.to_string(),
            _ => return Err(format!("Unknown argument: {}", args[i])),
        }
        i += 1;
    }

    if config.rate_hz <= 0.0 || config.period_s <= 0.0 {
        return Err("--rate and --period must be positive".to_string());
    }
    Ok(config)
}

fn next_value(args: &[String], i: &mut usize) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", args[*i - 1]))
}

fn parse_number(value: &str) -> Result<f64, String> {
    value
        .parse()
        .map_err(|e| format!("Invalid number '{}': {}", value, e))
}

fn print_usage(program: &str) {
    eprintln!(
        r#"
Usage: {} [TARGET] [OPTIONS]

Arguments:
  TARGET              Destination address (default: 127.0.0.1:51001)

Options:
  --body NAME         Rigid body name (default: RIGID01)
  --rate HZ           Frames per second (default: 100)
  --amplitude MM      Peak X displacement in mm (default: 20)
  --period S          Oscillation period in seconds (default: 4)
  -h, --help          Show this help
"#,
        program
    );
}

fn run(config: Config) -> std::io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(&config.target)?;

    let frame_interval = Duration::from_secs_f64(1.0 / config.rate_hz);
    let omega = std::f64::consts::TAU / config.period_s;
    let start = Instant::now();

    info!(
        "Streaming '{}' to {} at {:.0} Hz (±{:.1} mm, {:.1} s period)",
        config.body, config.target, config.rate_hz, config.amplitude_mm, config.period_s
    );

    let mut frame_number: u32 = 0;
    loop {
        let t = start.elapsed().as_secs_f64();
        let x = config.amplitude_mm * (omega * t).sin();
        let pose = BodyPose::new(config.body.as_str(), [x, 0.0, 500.0], [0.0; 3]);

        socket.send(&FrameEncoder::single(frame_number, &pose))?;
        if frame_number % 100 == 0 {
            tracing::debug!("Frame {}: x={:+.2} mm", frame_number, x);
        }

        frame_number = frame_number.wrapping_add(1);
        std::thread::sleep(frame_interval);
    }
}
