//! Hand landmark regression with a pre-trained ONNX model.
//!
//! The model is opaque: a single-hand MediaPipe-style landmark graph taking a
//! 224x224 RGB crop and returning 21 keypoints, a hand presence score and a
//! handedness score. This module only adapts tensors in and out; all actual
//! detection happens inside the graph.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use image::RgbImage;
use ndarray::s;
use smallvec::SmallVec;
use tract_onnx::prelude::*;

use crate::{
    hand::{DetectedHand, Handedness, Landmark},
    utils::download_file,
};

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;
type NnOut = SmallVec<[Arc<Tensor>; 4]>;

/// Community ONNX export of the MediaPipe hand landmark graph. If the
/// download is unavailable, fetch `hand_landmark_lite.onnx` manually (e.g.
/// from the PINTO model zoo, https://github.com/PINTO0309/PINTO_model_zoo)
/// and pass it via `--model-path`.
const MODEL_URL: &str =
    "https://github.com/PINTO0309/PINTO_model_zoo/releases/download/v1.0/hand_landmark_lite.onnx";
const MODEL_FILENAME: &str = "hand_landmark_lite.onnx";

/// Model input edge length in pixels.
const INPUT_SIZE: u32 = 224;

pub trait LandmarkModel {
    /// Run landmark regression on a full camera frame. Returns `None` when no
    /// hand is present with sufficient confidence.
    fn run(&self, frame: &RgbImage) -> Result<Option<DetectedHand>>;
}

pub struct HandLandmarkModel {
    model: NnModel,
    min_presence: f32,
}

impl HandLandmarkModel {
    /// Load the model, downloading it to the user cache dir if `model_path`
    /// is not given.
    pub async fn new(model_path: Option<PathBuf>, min_presence: f32) -> Result<Self> {
        let model_path = match model_path {
            Some(path) => path,
            None => fetch_model().await?,
        };

        let input_fact = InferenceFact::dt_shape(
            f32::datum_type(),
            tvec!(1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
        );
        let model = tract_onnx::onnx()
            .model_for_path(&model_path)?
            .with_input_fact(0, input_fact)?
            .into_optimized()?
            .into_runnable()?;

        log::info!("Initialized hand landmark model from {:?}", model_path);

        Ok(Self {
            model,
            min_presence,
        })
    }

    fn preproc(&self, frame: &RgbImage) -> Tensor {
        let resized: RgbImage = image::imageops::resize(
            frame,
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::Triangle,
        );

        // The landmark graph expects plain [0, 1] scaling, no mean/std.
        tract_ndarray::Array4::from_shape_fn(
            (1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
            |(_, c, y, x)| resized[(x as _, y as _)][c] as f32 / 255.0,
        )
        .into()
    }

    fn postproc(&self, raw_nn_out: NnOut) -> Result<Option<DetectedHand>> {
        // Output 0: [1, 63] landmark coordinates (x, y, z) in input pixels.
        // Output 1: [1, 1] hand presence score.
        // Output 2: [1, 1] handedness score, right-hand probability.
        let presence = first_scalar(&raw_nn_out, 1)?;
        if presence < self.min_presence {
            return Ok(None);
        }

        let coords = raw_nn_out[0].to_array_view::<f32>()?.slice(s![0, ..]).to_vec();
        if coords.len() < 63 {
            bail!("unexpected landmark tensor length {}", coords.len());
        }

        let mut landmarks = [Landmark::default(); 21];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = Landmark {
                x: coords[3 * i] / INPUT_SIZE as f32,
                y: coords[3 * i + 1] / INPUT_SIZE as f32,
            };
        }

        // Missing or ambiguous handedness defaults to `Right`.
        let handedness = match first_scalar(&raw_nn_out, 2) {
            Ok(score) if score < 0.5 => Handedness::Left,
            _ => Handedness::default(),
        };

        Ok(Some(DetectedHand {
            landmarks,
            handedness,
            confidence: presence,
        }))
    }
}

impl LandmarkModel for HandLandmarkModel {
    fn run(&self, frame: &RgbImage) -> Result<Option<DetectedHand>> {
        let valid_input = tvec!(self.preproc(frame));
        let raw_nn_out = self.model.run(valid_input)?;
        self.postproc(raw_nn_out)
    }
}

fn first_scalar(raw_nn_out: &NnOut, idx: usize) -> Result<f32> {
    raw_nn_out
        .get(idx)
        .ok_or_else(|| anyhow!("model output {idx} missing"))?
        .to_array_view::<f32>()?
        .iter()
        .copied()
        .next()
        .ok_or_else(|| anyhow!("model output {idx} empty"))
}

/// Ensure the model file exists in the cache dir, downloading it on first use.
async fn fetch_model() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("no cache dir on this platform"))?
        .join("gesture_server");
    std::fs::create_dir_all(&cache_dir)?;

    let model_path = cache_dir.join(MODEL_FILENAME);
    if !Path::new(&model_path).exists() {
        log::info!("Downloading hand landmark model to {:?}", model_path);
        let client = reqwest::Client::new();
        download_file(&client, MODEL_URL, &model_path).await?;
    }

    Ok(model_path)
}
