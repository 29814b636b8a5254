//! Protocol definition for the camera data socket.
//!
use serde::{Deserialize, Serialize};

/// Definition of protocol messages.
#[derive(Debug, Deserialize, Serialize)]
pub enum ProtoMsg {
    ConnectReq(String),
    FrameMsg(FrameMsg),
}

/// One captured camera frame.
///
/// `id` names the channel the sender publishes to, `seq` counts frames since
/// the sender connected, `data` is a complete JPEG buffer.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FrameMsg {
    pub id: String,
    pub seq: u64,
    pub data: Vec<u8>,
}

impl FrameMsg {
    pub fn new(id: String, seq: u64, data: Vec<u8>) -> Self {
        Self { id, seq, data }
    }
}

impl ProtoMsg {
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Box<bincode::ErrorKind>> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::Error;

    #[test]
    fn test_bincode_serde() -> Result<(), Error> {
        let frame_msg = FrameMsg {
            id: "cam0".into(),
            seq: 17,
            data: vec![1, 2, 3],
        };

        let serialized: Vec<u8> = bincode::serialize(&ProtoMsg::FrameMsg(frame_msg))?;
        let deserialized = ProtoMsg::deserialize(&serialized[..])?;

        match deserialized {
            ProtoMsg::FrameMsg(msg) => {
                assert_eq!(msg.id, "cam0");
                assert_eq!(msg.seq, 17);
                assert_eq!(msg.data, vec![1, 2, 3]);
            }
            other => panic!("unexpected message {other:?}"),
        }

        Ok(())
    }
}
