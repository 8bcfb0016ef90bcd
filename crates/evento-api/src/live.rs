// Live notice streaming over SSE
//
// Streams are fed from the in-process broadcast hub, not from storage:
// notices are ephemeral and a client that connects late simply starts
// from now. Lagged receivers skip what they missed.

use axum::{
    extract::{Path, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use evento_core::{Notice, Topic};

use crate::broadcast::{BroadcastHub, Envelope};
use crate::error::ApiError;
use crate::services::EventService;

/// App state for live routes
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<BroadcastHub>,
    pub events: Arc<EventService>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/live", get(global_live))
        .route("/v1/events/:event_id/live", get(event_live))
        .with_state(state)
}

/// GET /v1/live - Global notice stream (new events, registration
/// activity, feedback requests)
#[utoipa::path(
    get,
    path = "/v1/live",
    responses(
        (status = 200, description = "Notice stream", content_type = "text/event-stream")
    ),
    tag = "live"
)]
pub async fn global_live(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let stream = notice_stream(state.hub.subscribe(), Topic::Global);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /v1/events/{event_id}/live - Seat updates for one event (plus
/// global announcements)
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/live",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Notice stream", content_type = "text/event-stream"),
        (status = 404, description = "Event not found")
    ),
    tag = "live"
)]
pub async fn event_live(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    // 404 for unknown events instead of a silent empty stream
    let _ = state.events.get(event_id).await?;
    let stream = notice_stream(state.hub.subscribe(), Topic::Event(event_id));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn notice_stream(
    rx: broadcast::Receiver<Envelope>,
    topic: Topic,
) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(envelope) if envelope.visible_on(topic) => Some(Ok(to_sse(&envelope.notice))),
        _ => None,
    })
}

/// SSE event named after the notice's serde tag, payload = full JSON
fn to_sse(notice: &Notice) -> SseEvent {
    let value = serde_json::to_value(notice).unwrap_or_default();
    let name = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("notice")
        .to_owned();
    SseEvent::default().event(name).data(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evento_core::Notifier;

    #[tokio::test]
    async fn event_stream_filters_other_events() {
        let hub = BroadcastHub::new();
        let watched = Uuid::now_v7();
        let other = Uuid::now_v7();
        let mut stream = Box::pin(notice_stream(hub.subscribe(), Topic::Event(watched)));

        hub.publish(
            Topic::Event(other),
            Notice::SeatUpdate {
                event_id: other,
                participants_count: 9,
                waitlist_count: 0,
            },
        );
        hub.publish(
            Topic::Event(watched),
            Notice::SeatUpdate {
                event_id: watched,
                participants_count: 4,
                waitlist_count: 1,
            },
        );

        // Only the watched event's update comes through
        let first = stream.next().await.unwrap();
        assert!(first.is_ok());
    }

    #[tokio::test]
    async fn global_stream_receives_announcements() {
        let hub = BroadcastHub::new();
        let mut stream = Box::pin(notice_stream(hub.subscribe(), Topic::Global));

        hub.publish(
            Topic::Global,
            Notice::NewEvent {
                event_id: Uuid::now_v7(),
                name: "Tech Fest".into(),
            },
        );

        assert!(stream.next().await.is_some());
    }
}
