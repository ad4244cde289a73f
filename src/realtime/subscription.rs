/**
 * Realtime Subscription Handler
 *
 * Server-Sent Events endpoint (`GET /realtime`) relaying the broadcast
 * channel to connected clients. Lagged subscribers skip missed events and
 * keep their connection; this channel promises liveness, not history.
 */

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::realtime::broadcast::ContentEventBroadcast;

/// Handle a realtime subscription (GET /realtime).
///
/// Each event is sent as an SSE message whose `event:` field is the
/// content event name (`newsAdded`, `actionAdded`, ...) and whose data is
/// the full JSON event.
pub async fn handle_realtime_subscription(
    State(broadcast_tx): State<ContentEventBroadcast>,
) -> Sse<impl Stream<Item = Result<Event, std::convert::Infallible>>> {
    tracing::info!("[Realtime] New SSE subscriber");

    let rx = broadcast_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(content_event) => {
            match Event::default()
                .event(content_event.event.clone())
                .json_data(&content_event)
            {
                Ok(sse_event) => Some(Ok(sse_event)),
                Err(err) => {
                    tracing::error!("[Realtime] Failed to serialize event: {:?}", err);
                    None
                }
            }
        }
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::warn!("[Realtime] Subscriber lagged, skipped {} events", missed);
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
