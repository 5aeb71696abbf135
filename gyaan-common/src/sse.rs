//! Server-Sent Events (SSE) utilities
//!
//! Shared SSE stream construction for GYAAN services.

use crate::events::EventBus;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info};

/// Create an SSE stream that forwards EventBus events to one client.
///
/// Sends an initial `ConnectionStatus: connected` event, then every
/// platform event serialized as JSON, with a heartbeat comment every 15
/// seconds while idle.
pub fn event_bus_sse_stream(
    service_name: &'static str,
    bus: &EventBus,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);
    let mut rx = bus.subscribe();

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            match tokio::time::timeout(Duration::from_secs(15), rx.recv()).await {
                Ok(Ok(event)) => {
                    match serde_json::to_string(&event) {
                        Ok(json) => {
                            yield Ok(Event::default().event("PlatformEvent").data(json));
                        }
                        Err(e) => {
                            debug!("SSE: failed to serialize event: {}", e);
                        }
                    }
                }
                Ok(Err(_)) => {
                    // Sender dropped or this client lagged past the buffer;
                    // either way the stream is done
                    break;
                }
                Err(_) => {
                    debug!("SSE: sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
