//! Threshold shuttle controller.
//!
//! Keeps the tracked body moving back and forth along X inside
//! `[-limit, +limit]` (relative to home):
//!
//! ```text
//!   x < -limit          -limit ≤ x ≤ +limit          x > +limit
//! ─────────────┼──────────────────────────────┼─────────────
//!   Forward        no command (keep going)        Backward
//! ```
//!
//! Each tick drains the ingest socket, reads the relative X and, when it is
//! outside the box, commands the actuator toward the other side. Inside the
//! box nothing is sent and the actuator keeps its last motion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::actuator::{MotionActuator, MotionCommand};
use crate::config::ShuttleConfig;
use crate::error::{Result, ShuttleError};
use crate::ingest::{PollResult, UdpIngest};
use crate::tracking::TrackerState;

/// Upper bound on datagrams consumed per tick.
const MAX_POLLS_PER_TICK: usize = 256;

/// Interval between "waiting for Vicon" messages.
const WAIT_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Shuttle direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn command(self) -> MotionCommand {
        match self {
            Direction::Forward => MotionCommand::Forward,
            Direction::Backward => MotionCommand::Backward,
        }
    }
}

/// Direction-reversal state machine plus its loop.
#[derive(Debug, Clone)]
pub struct ShuttleController {
    /// Half-width of the box in relative-pose units (cm).
    limit: f64,
    /// Sleep between ticks.
    interval: Duration,
    /// Undecided until the first excursion past the limit.
    direction: Option<Direction>,
}

impl ShuttleController {
    pub fn new(limit: f64, interval: Duration) -> Self {
        Self {
            limit,
            interval,
            direction: None,
        }
    }

    pub fn from_config(config: &ShuttleConfig) -> Self {
        Self::new(config.pose_limit(), config.loop_interval())
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Transition law for one relative-X sample.
    ///
    /// Returns the direction to command, or `None` when `x` is inside the box.
    /// The stored direction persists across `None` samples.
    pub fn decide(&mut self, x: f64) -> Option<Direction> {
        let next = if x > self.limit {
            Direction::Backward
        } else if x < -self.limit {
            Direction::Forward
        } else {
            return None;
        };

        if self.direction != Some(next) {
            info!(
                "Relative X {:+.3} outside ±{:.3}, heading {:?}",
                x, self.limit, next
            );
        }
        self.direction = Some(next);
        Some(next)
    }

    /// One loop iteration without the sleep.
    ///
    /// No command is issued until the home reference is latched.
    pub fn tick<A: MotionActuator>(
        &mut self,
        ingest: &mut UdpIngest,
        state: &mut TrackerState,
        actuator: &mut A,
    ) -> Result<Option<Direction>> {
        pump(ingest, state)?;

        let Some(relative) = state.relative() else {
            return Ok(None);
        };
        trace!("Vicon X rel: {:+.4}", relative.x);

        let decision = self.decide(relative.x);
        if let Some(direction) = decision {
            actuator.execute(direction.command())?;
        }
        Ok(decision)
    }

    /// Run until `running` is cleared, then stop the actuator.
    ///
    /// A socket error also stops the actuator before it is returned.
    pub fn run<A: MotionActuator>(
        &mut self,
        ingest: &mut UdpIngest,
        state: &mut TrackerState,
        actuator: &mut A,
        running: &AtomicBool,
    ) -> Result<()> {
        info!(
            "Shuttle controller started: limit ±{:.3}, period {:?}",
            self.limit, self.interval
        );

        while running.load(Ordering::Relaxed) {
            if let Err(e) = self.tick(ingest, state, actuator) {
                if let Err(stop_err) = actuator.stop() {
                    warn!("Failed to stop actuator after error: {}", stop_err);
                }
                return Err(e);
            }
            std::thread::sleep(self.interval);
        }

        info!(
            "Shuttle controller stopping ({} frames decoded, {} skipped)",
            ingest.frames_decoded(),
            ingest.frames_skipped()
        );
        actuator.stop()
    }
}

/// Drain pending datagrams so the tick sees the newest pose.
fn pump(ingest: &mut UdpIngest, state: &mut TrackerState) -> Result<usize> {
    let mut decoded = 0;
    for _ in 0..MAX_POLLS_PER_TICK {
        match ingest.poll_once(state)? {
            PollResult::NoData => break,
            PollResult::Decoded(_) => decoded += 1,
            PollResult::Skipped(_) => {}
        }
    }
    Ok(decoded)
}

/// Fail unless the actuator reports ready within `timeout`.
pub fn ensure_ready<A: MotionActuator>(actuator: &mut A, timeout: Duration) -> Result<()> {
    if actuator.wait_until_ready(timeout)? {
        info!("Actuator ready");
        Ok(())
    } else {
        Err(ShuttleError::ActuatorNotReady)
    }
}

/// Pump ingest until the home reference is latched.
///
/// Returns `Ok(false)` if `running` was cleared first. `timeout` of `None`
/// waits forever.
pub fn wait_for_home(
    ingest: &mut UdpIngest,
    state: &mut TrackerState,
    timeout: Option<Duration>,
    running: &AtomicBool,
) -> Result<bool> {
    let start = Instant::now();
    let mut last_log: Option<Instant> = None;

    while !state.is_home_initialized() {
        if !running.load(Ordering::Relaxed) {
            return Ok(false);
        }
        if let Some(limit) = timeout
            && start.elapsed() >= limit
        {
            return Err(ShuttleError::HomeTimeout(limit));
        }
        if last_log.is_none_or(|t| t.elapsed() >= WAIT_LOG_INTERVAL) {
            info!(
                "Waiting for Vicon pose of '{}'...",
                state.tracker().tracked_name()
            );
            last_log = Some(Instant::now());
        }

        if let PollResult::Skipped(e) = ingest.poll_once(state)? {
            debug!("Skipped datagram while waiting for home: {}", e);
        }
    }

    info!("Vicon connected, home reference set");
    Ok(true)
}
