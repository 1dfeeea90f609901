use axum::Json;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// Content negotiation for GET endpoints: an Accept header of exactly
/// `application/xml` yields XML, anything else yields JSON. `root` names the
/// XML element; a sequence serializes as one `root` element per item.
pub fn negotiated<T: Serialize>(
    headers: &HeaderMap,
    root: &str,
    value: &T,
) -> Result<Response, ApiError> {
    let wants_xml = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "application/xml")
        .unwrap_or(false);

    if wants_xml {
        let body = quick_xml::se::to_string_with_root(root, value)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("xml encoding failed: {e}")))?;
        Ok(([(header::CONTENT_TYPE, "application/xml")], body).into_response())
    } else {
        Ok(Json(value).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_types::api::Post;

    fn post() -> Post {
        Post {
            id: 1,
            user_id: 7,
            title: "hello".into(),
            body: "world".into(),
        }
    }

    #[test]
    fn defaults_to_json() {
        let resp = negotiated(&HeaderMap::new(), "post", &post()).unwrap();
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn exact_xml_accept_yields_xml() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "application/xml".parse().unwrap());
        let resp = negotiated(&headers, "post", &post()).unwrap();
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );
    }

    #[test]
    fn other_accept_values_yield_json() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/xml".parse().unwrap());
        let resp = negotiated(&headers, "post", &post()).unwrap();
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn list_serializes_as_repeated_elements() {
        let posts = vec![post(), post()];
        let body = quick_xml::se::to_string_with_root("post", &posts).unwrap();
        assert_eq!(body.matches("<post>").count(), 2);
        assert!(body.contains("<userId>7</userId>"));
        assert!(body.contains("<title>hello</title>"));
    }
}
