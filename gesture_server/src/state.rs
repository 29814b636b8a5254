//! Shared cursor/gesture snapshot read by the status endpoint.
//!
//! The tracker overwrites the snapshot once per processed frame; the HTTP
//! path only ever reads a copy. Staleness is tolerable for a display
//! overlay, so a plain mutex-guarded value is all the coordination needed.

use std::sync::Mutex;

use serde::Serialize;

use crate::gesture::{Gesture, GestureFrame};

/// JSON payload of the `/finger_position` endpoint. Cursor coordinates are
/// normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FingerPosition {
    pub x: f32,
    pub y: f32,
    pub draw: bool,
    pub cursor: bool,
    pub eraser: bool,
}

/// Latest classification result, single writer, overwritten every frame.
#[derive(Default)]
pub struct GestureState {
    snapshot: Mutex<FingerPosition>,
}

impl GestureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with this frame's result. Every mode flag resets
    /// before reclassifying, so no gesture identity leaks across frames; the
    /// cursor position alone persists as the last known fingertip location
    /// for display purposes.
    pub fn update(&self, frame: &GestureFrame) {
        let mut snapshot = self.snapshot.lock().unwrap();

        let mut next = FingerPosition {
            x: snapshot.x,
            y: snapshot.y,
            ..FingerPosition::default()
        };

        if let Some(tip) = frame.cursor {
            next.x = tip.x;
            next.y = tip.y;
            next.cursor = true;
            next.draw = frame.gesture == Gesture::Draw;
            next.eraser = frame.gesture == Gesture::Erase;
        }

        *snapshot = next;
    }

    pub fn snapshot(&self) -> FingerPosition {
        *self.snapshot.lock().unwrap()
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::hand::Landmark;

    #[test]
    fn defaults_before_first_frame() {
        let state = GestureState::new();
        assert_eq!(state.snapshot(), FingerPosition::default());
    }

    #[test]
    fn draw_frame_sets_cursor_and_draw() {
        let state = GestureState::new();
        state.update(&GestureFrame {
            gesture: Gesture::Draw,
            cursor: Some(Landmark { x: 0.25, y: 0.75 }),
        });

        let snapshot = state.snapshot();
        assert_eq!(snapshot.x, 0.25);
        assert_eq!(snapshot.y, 0.75);
        assert!(snapshot.cursor);
        assert!(snapshot.draw);
        assert!(!snapshot.eraser);
    }

    #[test]
    fn erase_frame_sets_eraser_not_draw() {
        let state = GestureState::new();
        state.update(&GestureFrame {
            gesture: Gesture::Erase,
            cursor: Some(Landmark { x: 0.5, y: 0.5 }),
        });

        let snapshot = state.snapshot();
        assert!(snapshot.cursor);
        assert!(snapshot.eraser);
        assert!(!snapshot.draw);
    }

    #[test]
    fn no_hand_frame_resets_previous_gesture() {
        let state = GestureState::new();
        state.update(&GestureFrame {
            gesture: Gesture::Draw,
            cursor: Some(Landmark { x: 0.25, y: 0.75 }),
        });
        state.update(&GestureFrame::default());

        let snapshot = state.snapshot();
        assert!(!snapshot.cursor);
        assert!(!snapshot.draw);
        assert!(!snapshot.eraser);
    }

    #[test]
    fn cursor_position_persists_after_gesture_ends() {
        let state = GestureState::new();
        state.update(&GestureFrame {
            gesture: Gesture::Draw,
            cursor: Some(Landmark { x: 0.6, y: 0.4 }),
        });
        state.update(&GestureFrame::default());

        // The mode flags reset, but the last known fingertip location stays
        // available for display.
        let snapshot = state.snapshot();
        assert_eq!(snapshot.x, 0.6);
        assert_eq!(snapshot.y, 0.4);
        assert!(!snapshot.cursor);
        assert!(!snapshot.draw);
        assert!(!snapshot.eraser);
    }
}
