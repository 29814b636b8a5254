//! Fan-out of incoming camera frames to stream subscribers and the tracker.

use std::{collections::HashMap, sync::Mutex};

use anyhow::{bail, Result};
use common::protocol::ProtoMsg;

use crate::{
    as_jpeg_stream_item, broadcast_channel, hashed, BroadcastReceiver, BroadcastSender,
    StaticFrameReceiver, StaticTrackSender,
};

pub struct FrameRouter {
    raw_broadcast_map: Mutex<HashMap<u64, BroadcastSender>>,
    annotated_broadcast_map: Mutex<HashMap<u64, BroadcastSender>>,
    track_tx: StaticTrackSender,
}

impl FrameRouter {
    pub fn new(track_tx: StaticTrackSender) -> Self {
        Self {
            raw_broadcast_map: Mutex::new(HashMap::new()),
            annotated_broadcast_map: Mutex::new(HashMap::new()),
            track_tx,
        }
    }

    /// Route frames until the incoming channel closes.
    ///
    /// Every frame goes to the tracker so the gesture snapshot stays fresh
    /// even with no stream viewer; the annotated broadcast sender rides along
    /// only while that stream has subscribers.
    pub async fn run(&self, rx: StaticFrameReceiver) -> Result<()> {
        let mut raw_sender_map = HashMap::new();
        let mut annotated_sender_map = HashMap::new();

        loop {
            {
                let mut raw_broadcast_map = self.raw_broadcast_map.lock().unwrap();
                raw_broadcast_map.retain(|_id, sender| sender.receiver_count() > 0);

                for (id, sender) in raw_broadcast_map.iter() {
                    raw_sender_map.insert(*id, sender.clone());
                }
                raw_sender_map.retain(|id, _sender| raw_broadcast_map.contains_key(id))
            }
            {
                let mut annotated_broadcast_map = self.annotated_broadcast_map.lock().unwrap();
                annotated_broadcast_map.retain(|_id, sender| sender.receiver_count() > 0);

                for (id, sender) in annotated_broadcast_map.iter() {
                    annotated_sender_map.insert(*id, sender.clone());
                }
                annotated_sender_map.retain(|id, _sender| annotated_broadcast_map.contains_key(id))
            }

            for _ in 0..4 {
                match rx.recv_ref().await {
                    None => bail!("incoming frames channel closed"),
                    Some(data) => {
                        if let Ok(ProtoMsg::FrameMsg(frame_msg)) = ProtoMsg::deserialize(&data[..])
                        {
                            let id = hashed(&frame_msg.id);
                            log::trace!("Routing frame {} of {}", frame_msg.seq, &frame_msg.id);

                            if let Some(sender) = raw_sender_map.get(&id) {
                                sender.send(as_jpeg_stream_item(&frame_msg.data)).ok();
                            }

                            // Frames are dropped when the tracker falls
                            // behind; stale frames are worthless.
                            if let Ok(mut frame) = self.track_tx.try_send_ref() {
                                frame.0.clear();
                                frame.0.extend_from_slice(&frame_msg.data);
                                frame.1 = annotated_sender_map.get(&id).cloned();
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn get_raw_receiver(&self, name: &str) -> BroadcastReceiver {
        subscribe(&self.raw_broadcast_map, name)
    }

    pub fn get_annotated_receiver(&self, name: &str) -> BroadcastReceiver {
        subscribe(&self.annotated_broadcast_map, name)
    }
}

fn subscribe(map: &Mutex<HashMap<u64, BroadcastSender>>, name: &str) -> BroadcastReceiver {
    let id = hashed(name);
    let mut map = map.lock().unwrap();

    if let Some(tx) = map.get(&id) {
        tx.subscribe()
    } else {
        let (tx, rx) = broadcast_channel();
        map.insert(id, tx);

        rx
    }
}
