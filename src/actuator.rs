//! Motion actuator interface.
//!
//! The vehicle owns trajectory generation, take-off and landing. The shuttle
//! controller only asks it to start moving forward, start moving backward or
//! stop.

use std::time::Duration;

use crate::error::Result;

/// Commands the controller can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Forward,
    Backward,
    Stop,
}

impl MotionCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Stop => "stop",
        }
    }
}

/// Opaque motion capability.
pub trait MotionActuator {
    /// Start (or keep) moving forward.
    fn move_forward(&mut self) -> Result<()>;

    /// Start (or keep) moving backward.
    fn move_backward(&mut self) -> Result<()>;

    /// Halt motion.
    fn stop(&mut self) -> Result<()>;

    /// Block until the vehicle reports the hardware it needs (e.g. a flow
    /// deck), or `timeout` expires. Returns whether it became ready.
    fn wait_until_ready(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    /// Dispatch a [`MotionCommand`].
    fn execute(&mut self, command: MotionCommand) -> Result<()> {
        match command {
            MotionCommand::Forward => self.move_forward(),
            MotionCommand::Backward => self.move_backward(),
            MotionCommand::Stop => self.stop(),
        }
    }
}

/// Dry-run actuator: logs each command and remembers the last one.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    last: Option<MotionCommand>,
    issued: u64,
}

impl LoggingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_command(&self) -> Option<MotionCommand> {
        self.last
    }

    /// Commands issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    fn record(&mut self, command: MotionCommand) -> Result<()> {
        if self.last != Some(command) {
            tracing::info!("Actuator: {}", command.as_str());
        } else {
            tracing::trace!("Actuator: {} (repeat)", command.as_str());
        }
        self.last = Some(command);
        self.issued += 1;
        Ok(())
    }
}

impl MotionActuator for LoggingActuator {
    fn move_forward(&mut self) -> Result<()> {
        self.record(MotionCommand::Forward)
    }

    fn move_backward(&mut self) -> Result<()> {
        self.record(MotionCommand::Backward)
    }

    fn stop(&mut self) -> Result<()> {
        self.record(MotionCommand::Stop)
    }
}
