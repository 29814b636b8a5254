//! Webcam capture and frame publishing.
pub mod sensors;

/// Error type.
pub type Error = Box<dyn std::error::Error>;
