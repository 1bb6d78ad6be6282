//! ViconShuttle - Vicon pose ingest and bounded shuttle control
//!
//! Receives the Vicon tracker UDP object stream, keeps the latest pose of each
//! rigid body, expresses the tracked body relative to where it was first seen
//! and drives a vehicle back and forth inside a symmetric box along X.
//!
//! ```text
//! UDP socket ──► vicon::FrameDecoder ──► tracking::TrackerState ──► ShuttleController ──► MotionActuator
//!                                         (PoseStore + HomeFrameTracker)
//! ```
//!
//! Everything runs on one thread: the controller pumps [`UdpIngest::poll_once`]
//! once per tick, so the tracker state needs no locking.

pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod ingest;
pub mod tracking;
pub mod vicon;

pub use actuator::{LoggingActuator, MotionActuator, MotionCommand};
pub use config::ShuttleConfig;
pub use controller::{Direction, ShuttleController, ensure_ready, wait_for_home};
pub use error::{Result, ShuttleError};
pub use ingest::{PollResult, UdpIngest};
pub use tracking::{DisplayPose, HomeFrameTracker, PoseStore, RelativePose, TrackerState};
pub use vicon::{BodyPose, DecodeError, DecodeMode, DecodedFrame, FrameDecoder, FrameEncoder};
