pub(crate) mod accept_event_stream;
pub(crate) mod subscription_request;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
