//! End-to-end request pipeline scenarios.

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use serde_json::json;

    use crate::{body_json, build_service, request, services_dir};

    #[tokio::test]
    async fn test_should_dispatch_get_to_list_operation() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(Method::GET, "/widgets", b"", None))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
        assert!(response.headers().contains_key("x-request-id"));

        let body = body_json(response).await;
        assert_eq!(body, json!([{"id": 1, "name": "bolt"}]));
    }

    #[tokio::test]
    async fn test_should_deserialize_json_body_before_dispatch() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(
                Method::POST,
                "/widgets",
                br#"{"name":"sprocket"}"#,
                Some("application/json"),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["payload"], json!({"name": "sprocket"}));
    }

    #[tokio::test]
    async fn test_should_pass_unrecognized_content_type_through_raw() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(
                Method::POST,
                "/widgets",
                b"\x00\x01\x02",
                Some("application/octet-stream"),
            ))
            .await;

        // The operation runs with an empty payload and the raw body intact.
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["payload"], json!(null));
        assert_eq!(body["raw_len"], json!(3));
    }

    #[tokio::test]
    async fn test_should_reject_malformed_body_for_matching_codec() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(
                Method::POST,
                "/widgets",
                b"{broken",
                Some("application/json"),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_should_decode_form_bodies() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(
                Method::POST,
                "/widgets",
                b"name=sprocket&size=large",
                Some("application/x-www-form-urlencoded"),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["payload"], json!({"name": "sprocket", "size": "large"}));
    }

    #[tokio::test]
    async fn test_should_answer_404_for_unmatched_route() {
        let dir = services_dir(&["Widgets"]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(Method::GET, "/gadgets", b"", None))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_answer_health_check_without_routing() {
        let dir = services_dir(&[]);
        let service = build_service(dir.path(), None);

        let response = service
            .handle(request(Method::GET, "/_health", b"", None))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("running"));
    }
}
