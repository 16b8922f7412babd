use axum::extract::State;
use axum::http::{header, HeaderMap, Uri};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use crate::pages::{find_page, render};
use crate::server::not_found::not_found_response;
use crate::server::visitors::{new_visitor_id, visitor_cookie, visitor_id};
use crate::server::ServerState;

pub(crate) async fn show_page(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let path = uri.path();
    let Some(page) = find_page(path) else {
        return not_found_response(&state, &headers, path);
    };

    let html = render(page);
    let (visitor, is_new) = match visitor_id(&headers) {
        Some(id) => (id, false),
        None => (new_visitor_id(), true),
    };
    state
        .visitors
        .record_navigation(&visitor, &page_location(&headers, &uri), page.path);
    state.diagnostics.page_rendered(page.path, html.clone());

    let mut response = Html(html).into_response();
    if is_new {
        if let Some(cookie) = visitor_cookie(&visitor) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Absolute URL of the request when the Host header is known, else the path.
pub(crate) fn page_location(headers: &HeaderMap, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|value| value.as_str())
        .unwrap_or_else(|| uri.path());
    match headers.get(header::HOST).and_then(|value| value.to_str().ok()) {
        Some(host) => format!("http://{host}{path_and_query}"),
        None => path_and_query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn location_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("site.example"));
        let uri: Uri = "/faq?ref=nav".parse().expect("uri");
        assert_eq!(page_location(&headers, &uri), "http://site.example/faq?ref=nav");
    }

    #[test]
    fn location_falls_back_to_path() {
        let uri: Uri = "/faq".parse().expect("uri");
        assert_eq!(page_location(&HeaderMap::new(), &uri), "/faq");
    }
}
