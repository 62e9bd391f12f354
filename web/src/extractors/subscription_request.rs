use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;

use domain::{AuthorizationContext, CorrelationId};
use events::{StreamingCategory, SubscriptionRequest};

use crate::extractors::RejectionType;
use crate::params::thing_stream::ThingStreamParams;

/// Header a client may set to pick its own session identity. Reusing a
/// value replaces the stream previously registered under it.
pub(crate) const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Builds the backend subscription for a things stream from the request's
/// query parameters and headers. Validation happens here so the controller
/// only ever sees a well-formed request.
pub(crate) struct StreamingSubscription(pub(crate) SubscriptionRequest);

#[async_trait]
impl<S> FromRequestParts<S> for StreamingSubscription
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ThingStreamParams>::from_request_parts(parts, state)
            .await
            .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

        let field_selector = params.field_selector().map_err(|_err| {
            (
                StatusCode::BAD_REQUEST,
                "BAD REQUEST: invalid fields parameter".to_string(),
            )
        })?;

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(CorrelationId::from_header)
            .unwrap_or_else(CorrelationId::generate);

        // The authorization context is resolved by upstream middleware and
        // carried through to the backend untouched. A deployment without
        // such middleware streams with an empty context.
        let authorization = parts
            .extensions
            .get::<AuthorizationContext>()
            .cloned()
            .unwrap_or_default();

        Ok(StreamingSubscription(SubscriptionRequest {
            category: StreamingCategory::Events,
            correlation_id,
            authorization,
            id_allowlist: params.id_allowlist(),
            field_selector,
            filter: params.filter,
        }))
    }
}
