//! Home-relative pose of the tracked body.
//!
//! The first observation of the tracked body is latched as "home" (the
//! take-off point). Every later observation is reported relative to it, in
//! centimetres and degrees.

use std::ops::Sub;

use crate::vicon::BodyPose;

/// Vicon millimetres to display centimetres.
pub const CM_PER_RAW_UNIT: f64 = 0.1;

/// Absolute pose in display units (cm, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Rotation about X (degrees)
    pub roll: f64,
    /// Rotation about Y (degrees)
    pub pitch: f64,
    /// Rotation about Z (degrees)
    pub yaw: f64,
}

impl DisplayPose {
    pub fn from_body(pose: &BodyPose) -> Self {
        Self {
            x: pose.pos_x * CM_PER_RAW_UNIT,
            y: pose.pos_y * CM_PER_RAW_UNIT,
            z: pose.pos_z * CM_PER_RAW_UNIT,
            roll: pose.rot_x.to_degrees(),
            pitch: pose.rot_y.to_degrees(),
            yaw: pose.rot_z.to_degrees(),
        }
    }
}

impl Sub for DisplayPose {
    type Output = RelativePose;

    fn sub(self, home: DisplayPose) -> RelativePose {
        RelativePose {
            x: self.x - home.x,
            y: self.y - home.y,
            z: self.z - home.z,
            roll: self.roll - home.roll,
            pitch: self.pitch - home.pitch,
            yaw: self.yaw - home.yaw,
        }
    }
}

/// Pose relative to home (cm, degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelativePose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl RelativePose {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };
}

impl Sub for RelativePose {
    type Output = RelativePose;

    fn sub(self, other: RelativePose) -> RelativePose {
        RelativePose {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            roll: self.roll - other.roll,
            pitch: self.pitch - other.pitch,
            yaw: self.yaw - other.yaw,
        }
    }
}

/// Latches the home pose of one body and reports poses relative to it.
#[derive(Debug, Clone)]
pub struct HomeFrameTracker {
    /// Body to follow. Empty follows whichever body is reported.
    tracked_name: String,
    /// Latched on first observation, read-only afterwards.
    home: Option<DisplayPose>,
}

impl HomeFrameTracker {
    pub fn new(tracked_name: impl Into<String>) -> Self {
        Self {
            tracked_name: tracked_name.into(),
            home: None,
        }
    }

    /// Update with a decoded pose.
    ///
    /// Returns `None` for bodies other than the tracked one. The first
    /// accepted pose becomes home, so the first result is always zero.
    pub fn update(&mut self, pose: &BodyPose) -> Option<RelativePose> {
        if !self.tracks(&pose.name) {
            return None;
        }

        let current = DisplayPose::from_body(pose);
        let home = *self.home.get_or_insert_with(|| {
            tracing::info!(
                "Home latched for '{}': ({:.2}, {:.2}, {:.2}) cm, yaw {:.2}°",
                pose.name,
                current.x,
                current.y,
                current.z,
                current.yaw
            );
            current
        });

        Some(current - home)
    }

    /// Whether `name` is the body this tracker follows.
    pub fn tracks(&self, name: &str) -> bool {
        self.tracked_name.is_empty() || self.tracked_name == name
    }

    pub fn is_initialized(&self) -> bool {
        self.home.is_some()
    }

    pub fn home(&self) -> Option<DisplayPose> {
        self.home
    }

    pub fn tracked_name(&self) -> &str {
        &self.tracked_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_pose_eq(a: RelativePose, b: RelativePose) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
        assert_relative_eq!(a.roll, b.roll, epsilon = 1e-9);
        assert_relative_eq!(a.pitch, b.pitch, epsilon = 1e-9);
        assert_relative_eq!(a.yaw, b.yaw, epsilon = 1e-9);
    }

    #[test]
    fn test_display_conversion() {
        let pose = BodyPose::new("CF", [1234.0, -50.0, 7.0], [FRAC_PI_2, 0.0, -FRAC_PI_2]);
        let display = DisplayPose::from_body(&pose);

        assert_relative_eq!(display.x, 123.4, epsilon = 1e-9);
        assert_relative_eq!(display.y, -5.0, epsilon = 1e-9);
        assert_relative_eq!(display.z, 0.7, epsilon = 1e-9);
        assert_relative_eq!(display.roll, 90.0, epsilon = 1e-9);
        assert_relative_eq!(display.pitch, 0.0, epsilon = 1e-9);
        assert_relative_eq!(display.yaw, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_update_is_zero() {
        for position in [[0.0; 3], [1000.0, -2000.0, 350.0], [1e6, 1e-6, -42.0]] {
            let mut tracker = HomeFrameTracker::new("CF");
            assert!(!tracker.is_initialized());

            let rel = tracker
                .update(&BodyPose::new("CF", position, [0.3, -1.2, 2.9]))
                .unwrap();
            assert_pose_eq(rel, RelativePose::ZERO);
            assert!(tracker.is_initialized());
        }
    }

    #[test]
    fn test_home_is_latched_once() {
        let mut tracker = HomeFrameTracker::new("CF");
        tracker.update(&BodyPose::new("CF", [100.0, 0.0, 0.0], [0.0; 3]));
        let home = tracker.home();

        tracker.update(&BodyPose::new("CF", [900.0, 50.0, 0.0], [0.0, 0.0, 1.0]));
        assert_eq!(tracker.home(), home);

        let rel = tracker
            .update(&BodyPose::new("CF", [600.0, 0.0, 0.0], [0.0; 3]))
            .unwrap();
        assert_relative_eq!(rel.x, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_difference_matches_converted_difference() {
        let mut tracker = HomeFrameTracker::new("CF");
        tracker.update(&BodyPose::new("CF", [10.0, 20.0, 30.0], [0.1, 0.2, 0.3]));

        let p1 = BodyPose::new("CF", [250.0, -75.0, 12.0], [0.5, -0.1, 1.0]);
        let p2 = BodyPose::new("CF", [-40.0, 300.0, 99.0], [-0.2, 0.4, -2.0]);
        let r1 = tracker.update(&p1).unwrap();
        let r2 = tracker.update(&p2).unwrap();

        let expected = DisplayPose::from_body(&p2) - DisplayPose::from_body(&p1);
        assert_pose_eq(r2 - r1, expected);
    }

    #[test]
    fn test_other_bodies_ignored() {
        let mut tracker = HomeFrameTracker::new("CF");
        assert!(tracker.update(&BodyPose::at_origin("WAND")).is_none());
        assert!(!tracker.is_initialized());

        assert!(tracker.update(&BodyPose::at_origin("CF")).is_some());
        assert!(tracker.is_initialized());
    }

    #[test]
    fn test_empty_name_follows_any_body() {
        let mut tracker = HomeFrameTracker::new("");
        assert!(tracker.tracks("anything"));
        let rel = tracker
            .update(&BodyPose::new("WAND", [10.0, 0.0, 0.0], [0.0; 3]))
            .unwrap();
        assert_pose_eq(rel, RelativePose::ZERO);
    }
}
