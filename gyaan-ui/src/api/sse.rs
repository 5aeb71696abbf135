//! Server-Sent Events endpoint

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use gyaan_common::sse::event_bus_sse_stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /api/events
///
/// Streams platform events (XP grants, approvals, roster changes) to
/// the browser with a 15 second heartbeat.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    event_bus_sse_stream("gyaan-ui", &state.events)
}
