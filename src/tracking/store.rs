//! Latest pose per rigid body.

use std::collections::HashMap;

use crate::vicon::BodyPose;

/// Name-keyed pose table.
///
/// Entries are overwritten on every ingest, never merged. There is no
/// eviction: the capture volume only ever holds a handful of bodies.
#[derive(Debug, Default)]
pub struct PoseStore {
    poses: HashMap<String, BodyPose>,
    /// Poses ingested since construction or the last [`reset`](Self::reset).
    object_count: u64,
}

impl PoseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `pose` under its name and bump the ingest counter.
    pub fn ingest(&mut self, pose: BodyPose) {
        self.object_count += 1;
        self.poses.insert(pose.name.clone(), pose);
    }

    pub fn get(&self, name: &str) -> Option<&BodyPose> {
        self.poses.get(name)
    }

    /// Total ingests. Cumulative: it is not cleared per frame.
    pub fn object_count(&self) -> u64 {
        self.object_count
    }

    /// Number of distinct bodies seen.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.poses.keys().map(String::as_str)
    }

    /// Drop all entries and zero the counter.
    pub fn reset(&mut self) {
        self.poses.clear();
        self.object_count = 0;
    }
}
