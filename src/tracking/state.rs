//! Tracker state owned by the ingest/control loop.

use crate::vicon::BodyPose;

use super::home::{HomeFrameTracker, RelativePose};
use super::store::PoseStore;

/// Everything the loop knows about the capture volume.
///
/// Passed by `&mut` into [`UdpIngest::poll_once`](crate::ingest::UdpIngest::poll_once)
/// and read by the controller on the same thread.
#[derive(Debug)]
pub struct TrackerState {
    store: PoseStore,
    tracker: HomeFrameTracker,
    relative: Option<RelativePose>,
    frame_number: Option<u32>,
}

impl TrackerState {
    pub fn new(tracked_name: impl Into<String>) -> Self {
        Self {
            store: PoseStore::new(),
            tracker: HomeFrameTracker::new(tracked_name),
            relative: None,
            frame_number: None,
        }
    }

    /// Ingest one decoded pose and refresh the relative pose if it belongs
    /// to the tracked body.
    pub fn apply(&mut self, pose: BodyPose) {
        if let Some(relative) = self.tracker.update(&pose) {
            tracing::debug!(
                "Position [cm]: {:+.4}, {:+.4}, {:+.4}  Attitude [deg]: {:+.4}, {:+.4}, {:+.4}",
                relative.x,
                relative.y,
                relative.z,
                relative.roll,
                relative.pitch,
                relative.yaw
            );
            self.relative = Some(relative);
        }
        self.store.ingest(pose);
    }

    /// Ingest a pose from a later item block of the same datagram.
    ///
    /// An unnamed tracker follows item 0 only, so later items just go to
    /// the store. A named tracker still picks its body out of any block.
    pub fn apply_secondary(&mut self, pose: BodyPose) {
        if self.tracker.tracked_name().is_empty() {
            self.store.ingest(pose);
        } else {
            self.apply(pose);
        }
    }

    /// Record the frame number of the last decoded datagram.
    pub fn set_frame_number(&mut self, frame_number: u32) {
        self.frame_number = Some(frame_number);
    }

    /// Latest relative pose of the tracked body, `None` until home is latched.
    pub fn relative(&self) -> Option<RelativePose> {
        self.relative
    }

    pub fn is_home_initialized(&self) -> bool {
        self.tracker.is_initialized()
    }

    pub fn frame_number(&self) -> Option<u32> {
        self.frame_number
    }

    pub fn store(&self) -> &PoseStore {
        &self.store
    }

    pub fn tracker(&self) -> &HomeFrameTracker {
        &self.tracker
    }
}
