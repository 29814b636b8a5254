//! Hand landmark types following the MediaPipe 21-point convention.
//!
//! Landmark indices have a fixed anatomical meaning: 4/8/12/16/20 are the
//! fingertips of thumb/index/middle/ring/pinky, the PIP constants below are
//! the joints the fingertip comparisons run against.

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Bone segments connecting the 21 landmarks, used for the skeleton overlay.
pub const CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (0, 17),
];

/// A single tracked keypoint, normalized to `[0, 1]` in both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Which hand the landmarks belong to. The thumb comparison polarity depends
/// on this; defaults to `Right` when the model reports nothing usable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

/// One hand's pose snapshot as returned by the landmark model.
#[derive(Clone, Debug)]
pub struct DetectedHand {
    pub landmarks: [Landmark; 21],
    pub handedness: Handedness,
    pub confidence: f32,
}

impl DetectedHand {
    /// Index fingertip, the anchor point for cursor/draw/erase rendering.
    pub fn index_tip(&self) -> Landmark {
        self.landmarks[INDEX_TIP]
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn connections_stay_in_landmark_range() {
        for (a, b) in CONNECTIONS {
            assert!(a < 21 && b < 21);
        }
    }
}
