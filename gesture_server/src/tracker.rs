//! Per-frame tracking task: decode, detect, classify, annotate.

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::{
    as_jpeg_stream_item,
    gesture::{self, Gesture, GestureFrame},
    hand::{self, DetectedHand},
    nn::{HandLandmarkModel, LandmarkModel},
    state::GestureState,
    StaticTrackReceiver,
};

const SKELETON_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const JOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const DRAW_COLOR: Rgb<u8> = Rgb([0, 128, 255]);
const ERASE_COLOR: Rgb<u8> = Rgb([255, 64, 64]);
const CURSOR_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

pub struct Tracker {
    track_rx: StaticTrackReceiver,
    model: HandLandmarkModel,
    state: Arc<GestureState>,
}

impl Tracker {
    pub async fn new(
        track_rx: StaticTrackReceiver,
        state: Arc<GestureState>,
        model_path: Option<PathBuf>,
    ) -> Result<Self> {
        let model = HandLandmarkModel::new(model_path, 0.5).await?;
        Ok(Self {
            track_rx,
            model,
            state,
        })
    }

    pub async fn run(&self) {
        loop {
            if let Some(recv_ref) = self.track_rx.recv_ref().await {
                let image: RgbImage = match turbojpeg::decompress_image(recv_ref.0.as_slice()) {
                    Ok(image) => image,
                    Err(err) => {
                        log::warn!("Failed to decode frame: {err}");
                        continue;
                    }
                };
                // Mirror the frame so the hand on screen moves like in a
                // mirror, matching what the painting page expects.
                let image = imageops::flip_horizontal(&image);

                let hand = match self.model.run(&image) {
                    Ok(hand) => hand,
                    Err(err) => {
                        log::warn!("Landmark inference failed: {err}");
                        None
                    }
                };

                let result = gesture::classify(hand.as_ref());
                self.state.update(&result);

                // Annotation and recompression only happen when someone is
                // actually watching the video stream.
                if let Some(sender) = recv_ref.1.as_ref() {
                    let frame = annotate(image, hand.as_ref(), &result);
                    match turbojpeg::compress_image(&frame, 95, turbojpeg::Subsamp::Sub2x2) {
                        Ok(buf) => {
                            sender.send(as_jpeg_stream_item(&buf)).ok();
                        }
                        Err(err) => log::warn!("Failed to encode frame: {err}"),
                    }
                }
            }
        }
    }
}

/// Draw the hand skeleton and the gesture cursor on the frame.
fn annotate(mut frame: RgbImage, hand: Option<&DetectedHand>, result: &GestureFrame) -> RgbImage {
    let (width, height) = (frame.width() as f32, frame.height() as f32);
    let to_px = |lm: hand::Landmark| (lm.x * width, lm.y * height);

    if let Some(hand) = hand {
        for &(a, b) in hand::CONNECTIONS.iter() {
            let start = to_px(hand.landmarks[a]);
            let end = to_px(hand.landmarks[b]);
            draw_line_segment_mut(&mut frame, start, end, SKELETON_COLOR);
        }
        for lm in hand.landmarks.iter() {
            let (x, y) = to_px(*lm);
            draw_filled_circle_mut(&mut frame, (x as i32, y as i32), 3, JOINT_COLOR);
        }
    }

    if let Some(tip) = result.cursor {
        let color = match result.gesture {
            Gesture::Draw => DRAW_COLOR,
            Gesture::Erase => ERASE_COLOR,
            _ => CURSOR_COLOR,
        };
        let (x, y) = to_px(tip);
        draw_filled_circle_mut(&mut frame, (x as i32, y as i32), 8, color);
    }

    frame
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::hand::{Handedness, Landmark};

    #[test]
    fn annotate_marks_the_cursor_position() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let result = GestureFrame {
            gesture: Gesture::Draw,
            cursor: Some(Landmark { x: 0.5, y: 0.5 }),
        };

        let annotated = annotate(frame, None, &result);
        assert_eq!(*annotated.get_pixel(50, 50), DRAW_COLOR);
    }

    #[test]
    fn annotate_draws_the_skeleton() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let hand = DetectedHand {
            landmarks: [Landmark { x: 0.5, y: 0.5 }; 21],
            handedness: Handedness::Right,
            confidence: 1.0,
        };
        let result = GestureFrame::default();

        let annotated = annotate(frame, Some(&hand), &result);
        // All landmarks coincide, so the joint marker wins at the center.
        assert_eq!(*annotated.get_pixel(50, 50), JOINT_COLOR);
    }
}
