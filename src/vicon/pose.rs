//! Rigid-body pose as transmitted by the capture system.

/// Pose of one named rigid body, in the units the Vicon system transmits.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPose {
    /// Object name (printable ASCII only)
    pub name: String,
    /// Translation X (mm)
    pub pos_x: f64,
    /// Translation Y (mm)
    pub pos_y: f64,
    /// Translation Z (mm)
    pub pos_z: f64,
    /// Rotation about X (radians)
    pub rot_x: f64,
    /// Rotation about Y (radians)
    pub rot_y: f64,
    /// Rotation about Z (radians)
    pub rot_z: f64,
}

impl BodyPose {
    /// Create a pose from translation `[x, y, z]` and rotation `[rx, ry, rz]`.
    pub fn new(name: impl Into<String>, position: [f64; 3], rotation: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            pos_x: position[0],
            pos_y: position[1],
            pos_z: position[2],
            rot_x: rotation[0],
            rot_y: rotation[1],
            rot_z: rotation[2],
        }
    }

    /// Pose at the capture origin with zero rotation.
    pub fn at_origin(name: impl Into<String>) -> Self {
        Self::new(name, [0.0; 3], [0.0; 3])
    }

    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.pos_x, self.pos_y, self.pos_z]
    }

    #[inline]
    pub fn rotation(&self) -> [f64; 3] {
        [self.rot_x, self.rot_y, self.rot_z]
    }
}
