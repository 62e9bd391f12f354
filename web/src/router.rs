use crate::controller::{health_check_controller, thing_stream_controller};
use crate::extractors::subscription_request::CORRELATION_ID_HEADER;
use crate::AppState;

use axum::http::header::{HeaderName, HeaderValue, ACCEPT};
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use log::*;
use tower_http::cors::CorsLayer;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Twin Gateway API"
        ),
        paths(
            thing_stream_controller::stream_things,
            health_check_controller::health_check,
        ),
        tags(
            (name = "twin_gateway", description = "Digital twin change event streaming API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(thing_stream_routes(app_state.clone()))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(cors_layer(&app_state))
}

fn thing_stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/things", get(thing_stream_controller::stream_things))
        .route("/things/", get(thing_stream_controller::stream_things))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

// An `EventSource` on a cross-origin page can only read the stream when its
// origin is allowed here.
fn cors_layer(app_state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping unparseable allowed origin {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET])
        .allow_headers([ACCEPT, HeaderName::from_static(CORRELATION_ID_HEADER)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::merge_slashes::merge_slashes;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::map_request;
    use clap::Parser;
    use events::SubscriptionManager;
    use service::config::Config;
    use tower::{Layer, ServiceExt};

    fn test_state() -> AppState {
        let config = Config::try_parse_from(["twin-gateway"]).unwrap();
        AppState::new(config, SubscriptionManager::spawn())
    }

    fn get_request(uri: &str, accept: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = define_routes(test_state())
            .oneshot(get_request("/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn the_api_docs_are_served() {
        let router = define_routes(test_state());

        for path in ["/rapidoc", "/api-docs/openapi.json"] {
            let response = router
                .clone()
                .oneshot(get_request(path, None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "expected 200 for {path}");
        }
    }

    #[tokio::test]
    async fn a_things_stream_opens_with_the_event_stream_content_type() {
        let response = define_routes(test_state())
            .oneshot(get_request("/things", Some("text/event-stream")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/event-stream"));
    }

    #[tokio::test]
    async fn clients_not_asking_for_an_event_stream_are_refused() {
        for accept in [Some("application/json"), Some("*/*"), None] {
            let response = define_routes(test_state())
                .oneshot(get_request("/things", accept))
                .await
                .unwrap();

            assert_eq!(
                response.status(),
                StatusCode::NOT_ACCEPTABLE,
                "expected 406 for Accept {accept:?}"
            );
        }
    }

    #[tokio::test]
    async fn malformed_fields_are_a_bad_request() {
        let response = define_routes(test_state())
            .oneshot(get_request(
                "/things?fields=attributes//color",
                Some("text/event-stream"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn double_slashes_collapse_before_routing() {
        let app = map_request(merge_slashes).layer(define_routes(test_state()));

        let response = app.oneshot(get_request("//health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn the_trailing_slash_variant_is_routed() {
        let response = define_routes(test_state())
            .oneshot(get_request("/things/", Some("text/event-stream")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
