use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use axum::http::StatusCode;

use crate::extractors::RejectionType;

/// Extractor that admits a request only when its `Accept` header asks for
/// `text/event-stream`. Everything else is rejected up front with
/// `406 Not Acceptable` so that browsers pointing an `EventSource` at the
/// wrong URL fail fast instead of hanging on a stream they cannot parse.
///
/// A media range with a wildcard primary type (`*/*` or `*/event-stream`)
/// does not count as asking for an event stream: permissive defaults sent
/// by generic HTTP clients should not opt them into an endless response.
/// `text/*` is accepted.
pub(crate) struct AcceptEventStream;

#[async_trait]
impl<S> FromRequestParts<S> for AcceptEventStream
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if accepts_event_stream(accept) {
            Ok(AcceptEventStream)
        } else {
            Err((
                StatusCode::NOT_ACCEPTABLE,
                "NOT ACCEPTABLE: Accept header must include text/event-stream".to_string(),
            ))
        }
    }
}

/// True when any media range in the `Accept` header value matches
/// `text/event-stream` without using a wildcard primary type.
fn accepts_event_stream(accept: &str) -> bool {
    accept
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .filter_map(|media_range| media_range.trim().split_once('/'))
        .any(|(main_type, subtype)| {
            if main_type == "*" {
                return false;
            }
            main_type.eq_ignore_ascii_case("text")
                && (subtype == "*" || subtype.eq_ignore_ascii_case("event-stream"))
        })
}
