//! Endpoints of HTTP server.
//!
use std::sync::Arc;

use axum::{
    body::StreamBody,
    extract::Query,
    http::header,
    response::{Html, IntoResponse},
    Extension, Json,
};
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    meter::METER,
    router::FrameRouter,
    state::{FingerPosition, GestureState},
};

/// Channel used when a client does not name one.
pub const DEFAULT_CHANNEL: &str = "cam0";

/// Search parameters available to streams.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    #[serde(default)]
    name: Option<String>,
}

/// Health check endpoint.
pub async fn healthcheck() -> &'static str {
    "healthy"
}

/// Embedded painting page.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Latest gesture snapshot, all defaults before the first processed frame.
pub async fn finger_position(
    Extension(state): Extension<Arc<GestureState>>,
) -> Json<FingerPosition> {
    Json(state.snapshot())
}

/// Passthrough stream of received camera frames.
pub async fn raw_stream(
    Extension(frame_router): Extension<Arc<FrameRouter>>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_else(|| DEFAULT_CHANNEL.into());
    log::info!("Raw stream for {} requested", &name);

    let rx = frame_router.get_raw_receiver(&name);

    let stream = BroadcastStream::from(rx).map(|x| {
        METER.raw.tick();
        x
    });

    // Set body and headers for multipart streaming
    let body = StreamBody::new(stream);
    let headers = [(
        header::CONTENT_TYPE,
        "multipart/x-mixed-replace; boundary=frame",
    )];

    (headers, body)
}

/// Stream of frames annotated with the hand skeleton and gesture cursor.
pub async fn video_stream(
    Extension(frame_router): Extension<Arc<FrameRouter>>,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_else(|| DEFAULT_CHANNEL.into());
    log::info!("Annotated stream for {} requested", &name);

    let rx = frame_router.get_annotated_receiver(&name);

    let stream = BroadcastStream::from(rx).map(|x| {
        METER.annotated.tick();
        x
    });

    // Set body and headers for multipart streaming
    let body = StreamBody::new(stream);
    let headers = [(
        header::CONTENT_TYPE,
        "multipart/x-mixed-replace; boundary=frame",
    )];

    (headers, body)
}
