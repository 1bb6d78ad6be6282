//! Pose bookkeeping between the decoder and the controller.
//!
//! - [`PoseStore`]: latest pose per body name
//! - [`HomeFrameTracker`]: home latch and home-relative pose of one body
//! - [`TrackerState`]: both of the above, owned by the run loop

mod home;
mod state;
mod store;

pub use home::{CM_PER_RAW_UNIT, DisplayPose, HomeFrameTracker, RelativePose};
pub use state::TrackerState;
pub use store::PoseStore;
