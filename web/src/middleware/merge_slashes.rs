use axum::extract::Request;
use axum::http::uri::Uri;

/// Collapses runs of `/` in the request path so that sloppily joined client
/// URLs like `//things` or `/things//` still reach their route.
///
/// Routing happens before `Router::layer` middleware runs, so this has to be
/// wrapped around the entire router with `axum::middleware::map_request` to
/// take effect.
pub async fn merge_slashes(request: Request) -> Request {
    let uri = request.uri();
    if !uri.path().contains("//") {
        return request;
    }

    let mut path = uri.path().to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = path_and_query.parse().ok();
    if parts.path_and_query.is_none() {
        return request;
    }

    let (mut request_parts, body) = request.into_parts();
    match Uri::from_parts(parts) {
        Ok(merged) => request_parts.uri = merged,
        Err(_) => return Request::from_parts(request_parts, body),
    }
    Request::from_parts(request_parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn duplicate_slashes_collapse() {
        let merged = merge_slashes(request("//things")).await;
        assert_eq!(merged.uri().path(), "/things");

        let merged = merge_slashes(request("/things///")).await;
        assert_eq!(merged.uri().path(), "/things/");
    }

    #[tokio::test]
    async fn the_query_string_survives_merging() {
        let merged = merge_slashes(request("//things?ids=demo:a,demo:b&fields=attributes")).await;

        assert_eq!(merged.uri().path(), "/things");
        assert_eq!(merged.uri().query(), Some("ids=demo:a,demo:b&fields=attributes"));
    }

    #[tokio::test]
    async fn clean_paths_pass_through_untouched() {
        let merged = merge_slashes(request("/things?fields=attributes")).await;

        assert_eq!(merged.uri().path(), "/things");
        assert_eq!(merged.uri().query(), Some("fields=attributes"));
    }
}
