//! Gesture server binary.
//!
use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{routing::get, Extension, Router};
use clap::Parser;
use env_logger::TimestampPrecision;
use gesture_server::{
    data_socket::spawn_data_socket,
    endpoints::{finger_position, healthcheck, index, raw_stream, video_stream},
    meter::spawn_meter_logger,
    router::FrameRouter,
    state::GestureState,
    tracker::Tracker,
    INCOMING_FRAMES_CHANNEL, TRACK_FRAMES_CHANNEL,
};

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Address the HTTP server binds to
    #[clap(long, default_value = "127.0.0.1:3000")]
    server_address: String,

    /// Address the camera data socket binds to
    #[clap(long, default_value = "127.0.0.1:3001")]
    socket_address: String,

    /// Local hand landmark model file, skips the cached download
    #[clap(long)]
    model_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logger
    env_logger::builder()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let (incoming_tx, incoming_rx) = INCOMING_FRAMES_CHANNEL.split();
    let (track_tx, track_rx) = TRACK_FRAMES_CHANNEL.split();

    let gesture_state = Arc::new(GestureState::new());
    let frame_router = Arc::new(FrameRouter::new(track_tx));

    {
        let frame_router = frame_router.clone();
        tokio::spawn(async move { frame_router.run(incoming_rx).await });
    }

    {
        let gesture_state = gesture_state.clone();
        let model_path = args.model_path.clone();
        tokio::spawn(async move {
            match Tracker::new(track_rx, gesture_state, model_path).await {
                Ok(tracker) => tracker.run().await,
                Err(err) => log::error!("Failed to initialize tracker: {err}"),
            }
        });
    }

    // Create socket to receive camera streams via network
    spawn_data_socket(incoming_tx, &args.socket_address).await?;

    spawn_meter_logger();

    // Build HTTP server with endpoints
    let app = Router::new()
        .route("/", get(index))
        .route("/healthcheck", get(healthcheck))
        .route("/stream", get(raw_stream))
        .route("/video", get(video_stream))
        .route("/finger_position", get(finger_position))
        .layer(Extension(frame_router))
        .layer(Extension(gesture_state));

    // Serve HTTP server
    let addr: SocketAddr = args.server_address.parse()?;
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
