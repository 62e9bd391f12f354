use std::convert::Infallible;

use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::{Stream, StreamExt};
use log::*;
use tokio::sync::mpsc;

use events::{StreamItem, SESSION_BUFFER_SIZE};
use sse::{with_heartbeat, EventPipeline, Session, SseFrame, HEARTBEAT_INTERVAL};

use crate::extractors::accept_event_stream::AcceptEventStream;
use crate::extractors::subscription_request::StreamingSubscription;
use crate::params::thing_stream::ThingStreamParams;
use crate::AppState;

/// GET a server-sent event stream of thing change events
///
/// The connection stays open until the client disconnects or the backend
/// reports a terminal error. Consumer-side filtering (`ids`, `fields`) is
/// applied per event before it is framed; `filter` is evaluated by the
/// backend itself.
#[utoipa::path(
    get,
    path = "/things",
    params(ThingStreamParams),
    responses(
        (status = 200, description = "Change events for matching things, one JSON view per frame", body = String, content_type = "text/event-stream"),
        (status = 400, description = "Malformed query parameter"),
        (status = 406, description = "Accept header does not ask for text/event-stream"),
        (status = 503, description = "Event subscriptions are unavailable")
    )
)]
pub async fn stream_things(
    _accept: AcceptEventStream,
    StreamingSubscription(subscription): StreamingSubscription,
    State(app_state): State<AppState>,
) -> crate::Result<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    debug!(
        "Opening things stream for session {}",
        subscription.correlation_id
    );

    let (sender, mut items) = mpsc::channel::<StreamItem>(SESSION_BUFFER_SIZE);

    let mut session = Session::new(app_state.subscriptions, subscription.correlation_id);
    let registration = session.connect(sender, subscription.category)?;
    session.start_streaming(registration, subscription.authorization, subscription.filter)?;

    let pipeline = EventPipeline::new(subscription.id_allowlist, subscription.field_selector);

    // The session moves into the stream so that it is dropped, and thereby
    // deregistered, when the client goes away and axum drops the response.
    let frames = stream! {
        while let Some(item) = items.recv().await {
            match item {
                StreamItem::Event(event) => {
                    if let Some(frame) = pipeline.apply(event) {
                        yield frame;
                    }
                }
                StreamItem::Error(error) => {
                    warn!("Ending session {}: {error}", session.correlation_id());
                    yield SseFrame::error(&error);
                    break;
                }
            }
        }
        session.close();
    };

    Ok(Sse::new(
        with_heartbeat(frames, HEARTBEAT_INTERVAL).map(|frame| Ok(frame.into_event())),
    ))
}
