pub mod data_socket;
pub mod endpoints;
pub mod gesture;
pub mod hand;
pub mod meter;
pub mod nn;
pub mod router;
pub mod state;
pub mod tracker;
pub mod utils;

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use thingbuf::mpsc::{StaticChannel, StaticReceiver, StaticSender};
use tokio::sync::broadcast;

/// Frames arriving on the data socket, still bincode-serialized.
pub static INCOMING_FRAMES_CHANNEL: StaticChannel<Vec<u8>, 4> = StaticChannel::new();

/// JPEG frames handed to the tracker, paired with the broadcast sender for
/// the annotated stream if anyone is watching it.
pub static TRACK_FRAMES_CHANNEL: StaticChannel<TrackFrame, 4> = StaticChannel::new();

pub type TrackFrame = (Vec<u8>, Option<BroadcastSender>);

pub type StaticFrameSender = StaticSender<Vec<u8>>;
pub type StaticFrameReceiver = StaticReceiver<Vec<u8>>;
pub type StaticTrackSender = StaticSender<TrackFrame>;
pub type StaticTrackReceiver = StaticReceiver<TrackFrame>;

pub type BroadcastSender = broadcast::Sender<Vec<u8>>;
pub type BroadcastReceiver = broadcast::Receiver<Vec<u8>>;

pub fn broadcast_channel() -> (BroadcastSender, BroadcastReceiver) {
    broadcast::channel(20)
}

pub fn hashed(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

/// Wrap a JPEG buffer as one item of a `multipart/x-mixed-replace` stream.
pub fn as_jpeg_stream_item(data: &[u8]) -> Vec<u8> {
    [
        "--frame\r\nContent-Type: image/jpeg\r\n\r\n".as_bytes(),
        data,
        "\r\n".as_bytes(),
    ]
    .concat()
}
