//! Finger-pose gesture classification.
//!
//! A pure function of the current frame's landmarks: five "finger extended"
//! flags are derived from fixed y-ordering comparisons (x for the thumb) and
//! mapped to a gesture. Nothing is carried between frames.

use crate::hand::{self, DetectedHand, Handedness, Landmark};

/// Per-finger "extended" flags for one frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// Derive the flags from one frame's landmarks.
    ///
    /// Image-space y grows downward, so a fingertip above its PIP joint means
    /// the finger is extended. The thumb extends sideways instead; its x
    /// comparison flips with handedness.
    pub fn from_landmarks(lm: &[Landmark; 21], handedness: Handedness) -> Self {
        let thumb = match handedness {
            Handedness::Right => lm[hand::THUMB_TIP].x > lm[hand::THUMB_IP].x,
            Handedness::Left => lm[hand::THUMB_TIP].x < lm[hand::THUMB_IP].x,
        };

        Self {
            thumb,
            index: lm[hand::INDEX_TIP].y < lm[hand::INDEX_PIP].y,
            middle: lm[hand::MIDDLE_TIP].y < lm[hand::MIDDLE_PIP].y,
            ring: lm[hand::RING_TIP].y < lm[hand::RING_PIP].y,
            pinky: lm[hand::PINKY_TIP].y < lm[hand::PINKY_PIP].y,
        }
    }
}

/// The classified intent for one frame.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Gesture {
    #[default]
    None,
    Cursor,
    Draw,
    Erase,
}

impl Gesture {
    /// Map a finger pattern to a gesture. The rules are checked in order and
    /// the first match wins. The thumb flag is computed upstream but not
    /// consulted here.
    pub fn from_finger_state(fingers: &FingerState) -> Self {
        if fingers.index && fingers.middle && !fingers.ring && !fingers.pinky {
            Gesture::Cursor
        } else if fingers.index && !fingers.middle && !fingers.ring && !fingers.pinky {
            Gesture::Draw
        } else if fingers.index && fingers.middle && fingers.ring && fingers.pinky {
            Gesture::Erase
        } else {
            Gesture::None
        }
    }
}

/// One frame's classification result: the gesture plus the index-fingertip
/// anchor when a cursor should be shown.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureFrame {
    pub gesture: Gesture,
    pub cursor: Option<Landmark>,
}

/// Classify one frame. `None` input means no hand was detected, which is not
/// an error: the result is `Gesture::None` with no cursor.
pub fn classify(hand: Option<&DetectedHand>) -> GestureFrame {
    match hand {
        None => GestureFrame::default(),
        Some(hand) => {
            let fingers = FingerState::from_landmarks(&hand.landmarks, hand.handedness);
            let gesture = Gesture::from_finger_state(&fingers);
            let cursor = match gesture {
                Gesture::None => None,
                _ => Some(hand.index_tip()),
            };

            GestureFrame { gesture, cursor }
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    /// Build a hand where each finger's tip sits above (extended) or below
    /// its PIP joint. All PIP joints sit at y = 0.5.
    fn hand_with(fingers: [bool; 4], handedness: Handedness) -> DetectedHand {
        let mut landmarks = [Landmark { x: 0.5, y: 0.9 }; 21];
        for lm in [
            hand::INDEX_PIP,
            hand::MIDDLE_PIP,
            hand::RING_PIP,
            hand::PINKY_PIP,
        ] {
            landmarks[lm] = Landmark { x: 0.5, y: 0.5 };
        }

        let tips = [
            hand::INDEX_TIP,
            hand::MIDDLE_TIP,
            hand::RING_TIP,
            hand::PINKY_TIP,
        ];
        for (tip, up) in tips.into_iter().zip(fingers) {
            let y = if up { 0.3 } else { 0.7 };
            landmarks[tip] = Landmark { x: 0.4, y };
        }

        // Thumb tip right of its IP joint, i.e. "up" for a right hand.
        landmarks[hand::THUMB_IP] = Landmark { x: 0.6, y: 0.6 };
        landmarks[hand::THUMB_TIP] = Landmark { x: 0.7, y: 0.6 };

        DetectedHand {
            landmarks,
            handedness,
            confidence: 0.9,
        }
    }

    #[test]
    fn index_and_middle_up_is_cursor() {
        let hand = hand_with([true, true, false, false], Handedness::Right);
        let result = classify(Some(&hand));
        assert_eq!(result.gesture, Gesture::Cursor);
        assert_eq!(result.cursor, Some(hand.index_tip()));
    }

    #[test]
    fn index_only_up_is_draw() {
        let hand = hand_with([true, false, false, false], Handedness::Right);
        let result = classify(Some(&hand));
        assert_eq!(result.gesture, Gesture::Draw);
        assert_eq!(result.cursor, Some(hand.index_tip()));
    }

    #[test]
    fn all_four_up_is_erase() {
        let hand = hand_with([true, true, true, true], Handedness::Right);
        assert_eq!(classify(Some(&hand)).gesture, Gesture::Erase);
    }

    #[test]
    fn unmatched_patterns_are_none_without_cursor() {
        let unmatched = [
            [false, false, false, false],
            [false, true, false, false],
            [false, true, true, true],
            [true, true, true, false],
            [true, false, true, false],
            [true, false, false, true],
            [false, false, true, true],
        ];
        for fingers in unmatched {
            let hand = hand_with(fingers, Handedness::Right);
            let result = classify(Some(&hand));
            assert_eq!(result.gesture, Gesture::None, "pattern {fingers:?}");
            assert_eq!(result.cursor, None, "pattern {fingers:?}");
        }
    }

    #[test]
    fn no_hand_is_none_without_cursor() {
        assert_eq!(classify(None), GestureFrame::default());
    }

    #[test]
    fn handedness_flips_only_the_thumb_flag() {
        let right = hand_with([true, false, false, false], Handedness::Right);
        let mut left = right.clone();
        left.handedness = Handedness::Left;

        let fingers_right = FingerState::from_landmarks(&right.landmarks, right.handedness);
        let fingers_left = FingerState::from_landmarks(&left.landmarks, left.handedness);

        assert!(fingers_right.thumb);
        assert!(!fingers_left.thumb);
        assert_eq!(
            (fingers_right.index, fingers_right.middle, fingers_right.ring, fingers_right.pinky),
            (fingers_left.index, fingers_left.middle, fingers_left.ring, fingers_left.pinky),
        );

        // The thumb is unused downstream, so the gesture must not change.
        assert_eq!(classify(Some(&right)), classify(Some(&left)));
    }

    #[test]
    fn pixel_space_draw_scenario() {
        // Index tip above its joint, every other tip at or below its joint.
        let mut landmarks = [Landmark::default(); 21];
        landmarks[hand::INDEX_TIP] = Landmark { x: 320.0, y: 100.0 };
        landmarks[hand::INDEX_PIP] = Landmark { x: 320.0, y: 150.0 };
        landmarks[hand::MIDDLE_TIP] = Landmark { x: 340.0, y: 160.0 };
        landmarks[hand::MIDDLE_PIP] = Landmark { x: 340.0, y: 150.0 };
        landmarks[hand::RING_TIP] = Landmark { x: 360.0, y: 200.0 };
        landmarks[hand::RING_PIP] = Landmark { x: 360.0, y: 150.0 };
        landmarks[hand::PINKY_TIP] = Landmark { x: 380.0, y: 210.0 };
        landmarks[hand::PINKY_PIP] = Landmark { x: 380.0, y: 150.0 };

        let hand = DetectedHand {
            landmarks,
            handedness: Handedness::Right,
            confidence: 1.0,
        };

        assert_eq!(classify(Some(&hand)).gesture, Gesture::Draw);
    }
}
