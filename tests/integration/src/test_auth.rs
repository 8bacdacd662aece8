//! Authorization behavior across the full pipeline.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use http::{Method, StatusCode};

    use restgate_core::RestgateError;
    use restgate_http::Controller;

    use crate::{PROBE_CALLS, SENTRY_CALLS, build_service, request, services_dir};

    #[test]
    fn test_should_fail_set_app_with_empty_binding() {
        let mut controller = Controller::new();
        let err = controller.set_app(None).unwrap_err();
        assert!(matches!(err, RestgateError::Configuration(_)));
        // Nothing was bound, so there is no app and no middleware chain.
        assert!(controller.app().is_none());
    }

    #[tokio::test]
    async fn test_should_reject_every_route_with_deny_all_callback() {
        let dir = services_dir(&["Sentry"]);
        let service = build_service(dir.path(), Some(Arc::new(|_| false)));

        let before = SENTRY_CALLS.load(Ordering::SeqCst);
        let response = service
            .handle(request(Method::GET, "/sentry", b"", None))
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        // Only this test serves the sentry route, so an unchanged counter
        // means the dispatcher was never reached.
        assert_eq!(SENTRY_CALLS.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_should_dispatch_when_callback_allows() {
        let dir = services_dir(&["Probe"]);
        let service = build_service(
            dir.path(),
            Some(Arc::new(|ctx| ctx.header("x-api-key") == Some("open-sesame"))),
        );

        let denied = service
            .handle(request(Method::GET, "/probe", b"", None))
            .await;
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let mut req = request(Method::GET, "/probe", b"", None);
        req.headers_mut()
            .insert("x-api-key", http::HeaderValue::from_static("open-sesame"));
        let before = PROBE_CALLS.load(Ordering::SeqCst);
        let allowed = service.handle(req).await;

        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(PROBE_CALLS.load(Ordering::SeqCst), before + 1);
    }

    #[tokio::test]
    async fn test_should_see_matched_route_in_callback() {
        let dir = services_dir(&["Widgets"]);
        // Authorize based on the operation the route resolved to: the
        // callback runs after resolution, so the context carries the match.
        let service = build_service(
            dir.path(),
            Some(Arc::new(|ctx| {
                ctx.route.as_ref().is_some_and(|r| r.operation == "list")
            })),
        );

        let response = service
            .handle(request(Method::GET, "/widgets", b"", None))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
