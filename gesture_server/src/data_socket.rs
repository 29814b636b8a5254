//! TCP socket receiving camera frame streams.

use futures::StreamExt;
use tokio::{
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::StaticFrameSender;

/// Listen for camera senders and forward their messages into the incoming
/// frames channel.
pub async fn spawn_data_socket(
    tx: StaticFrameSender,
    addr: &str,
) -> std::io::Result<JoinHandle<std::io::Result<()>>> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Data socket listening on {addr}");

    Ok(tokio::spawn(async move {
        loop {
            let (socket, _) = listener.accept().await?;
            let tx = tx.clone();
            tokio::spawn(async move { handle_incoming(socket, tx).await });
        }
    }))
}

async fn handle_incoming(stream: TcpStream, tx: StaticFrameSender) -> std::io::Result<()> {
    log::info!("{}: new camera connection", stream.peer_addr()?);

    let mut transport = Framed::new(stream, LengthDelimitedCodec::new());

    while let Some(Ok(data)) = transport.next().await {
        // Frames arriving while the channel is full are dropped.
        if let Ok(mut slot) = tx.try_send_ref() {
            slot.clear();
            slot.extend_from_slice(&data[..]);
        }
    }

    Ok(())
}
