pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::test_support::test_state;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn authed(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", "Bearer k")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn protected_route_requires_auth() {
        let (_dir, state) = test_state(vec!["test-key".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/projects/p1/chunks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn health_is_public() {
        let (_dir, state) = test_state(vec!["secret".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["database"]["status"], "ok");
        assert_eq!(json["data"]["previewCache"]["ttlSecs"], 300);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn openapi_json_is_public_and_valid() {
        let (_dir, state) = test_state(vec!["secret".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'), "unexpected OpenAPI version {version}");
        assert!(json["paths"]
            .get("/api/v1/projects/{projectId}/chunks:preview")
            .is_some());
    }

    #[tokio::test]
    async fn save_without_preview_is_stale_cache() {
        let (_dir, state) = test_state(vec!["k".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(authed(
                "POST",
                "/api/v1/projects/p1/chunks:save",
                serde_json::json!({ "hash": "deadbeef" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "stale_cache");
    }

    #[tokio::test]
    async fn self_merge_is_invalid_request() {
        let (_dir, state) = test_state(vec!["k".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(authed(
                "POST",
                "/api/v1/projects/p1/chunks:merge",
                serde_json::json!({ "sourceChunkId": "c1", "targetChunkId": "c1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn missing_body_field_is_reported() {
        let (_dir, state) = test_state(vec!["k".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(authed(
                "POST",
                "/api/v1/projects/p1/chunks:merge",
                serde_json::json!({ "sourceChunkId": "c1" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("targetChunkId"));
    }

    #[tokio::test]
    async fn both_chat_cursors_rejected() {
        let (_dir, state) = test_state(vec!["k".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/projects/p1/chats?userId=u1&startingAfter=a&endingBefore=b")
                    .header("Authorization", "Bearer k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chunk_list_has_pagination_meta() {
        let (_dir, state) = test_state(vec!["k".to_string()]).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/projects/p1/chunks?page=1&limit=5")
                    .header("Authorization", "Bearer k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["chunks"], serde_json::json!([]));
        assert_eq!(json["meta"]["total"], 0);
        assert_eq!(json["meta"]["hasMore"], false);
    }
}
