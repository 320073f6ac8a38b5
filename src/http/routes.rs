//! HTTP route configuration
//!
//! Wires up handlers into an axum Router.

use axum::{routing::get, Router};

use super::handlers::{
    create_product, delete_product, get_all_products, get_product, update_product,
};
use super::AppState;

pub const PRODUCT_PATH: &str = "/Product";
pub const GET_ALL_PATH: &str = "/GetAll";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            PRODUCT_PATH,
            get(get_product)
                .post(create_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route(GET_ALL_PATH, get(get_all_products))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::mediator::Mediator;
    use crate::mock_framework::{create_mock_repository, expect_get_by_id};
    use crate::product;
    use crate::repository::{ProductRepositoryRef, StoreActor};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let counter = Arc::new(AtomicI32::new(1));
        let (actor, client) =
            StoreActor::<Product>::new(10, move || counter.fetch_add(1, Ordering::SeqCst));
        tokio::spawn(actor.run());

        let repository: ProductRepositoryRef = Arc::new(client);
        let mediator = product::register(Mediator::builder(), repository)
            .unwrap()
            .build()
            .unwrap();
        create_router(AppState::new(mediator, CancellationToken::new()))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let router = test_router();

        let (status, body) = send(
            &router,
            json_request(Method::POST, "/Product", json!({"id": 1, "title": "Pen"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 1, "title": "Pen"}));

        let (status, body) = send(&router, empty_request(Method::GET, "/Product?id=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 1, "title": "Pen"}));
    }

    #[tokio::test]
    async fn test_create_with_long_title_is_bad_request() {
        let router = test_router();

        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/Product",
                json!({"id": 2, "title": "a title well over twenty"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation errors occurred");
        assert_eq!(body["errors"][0]["propertyName"], "Product.Title");
        assert_eq!(body["errors"][0]["errorMessage"], "Title is invalid");
    }

    #[tokio::test]
    async fn test_null_body_reaches_validators() {
        let router = test_router();

        let (status, body) = send(&router, json_request(Method::PUT, "/Product", Value::Null)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["errorMessage"], "Product detail can not be null");
    }

    #[tokio::test]
    async fn test_get_without_id_reports_empty_id() {
        let router = test_router();

        let (status, body) = send(&router, empty_request(Method::GET, "/Product")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["errorMessage"], "Id can not be empty");
    }

    #[tokio::test]
    async fn test_missing_product_is_server_error() {
        let router = test_router();

        let (status, body) = send(&router, empty_request(Method::DELETE, "/Product?id=9")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Product does not exist"}));
    }

    #[tokio::test]
    async fn test_update_delete_and_get_all() {
        let router = test_router();

        send(
            &router,
            json_request(Method::POST, "/Product", json!({"id": 3, "title": "Pen"})),
        )
        .await;

        let (status, body) = send(
            &router,
            json_request(Method::PUT, "/Product", json!({"id": 3, "title": "Pencil"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 3, "title": "Pencil"}));

        let (_, body) = send(&router, empty_request(Method::GET, "/GetAll")).await;
        assert_eq!(body, json!([{"id": 3, "title": "Pencil"}]));

        let (status, body) = send(&router, empty_request(Method::DELETE, "/Product?id=3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 3, "title": "Pencil"}));

        let (status, body) = send(&router, empty_request(Method::GET, "/GetAll")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_request() {
        let (repository, mut rx) = create_mock_repository(10);
        let repository: ProductRepositoryRef = Arc::new(repository);
        let mediator = product::register(Mediator::builder(), repository)
            .unwrap()
            .build()
            .unwrap();
        let shutdown = CancellationToken::new();
        let router = create_router(AppState::new(mediator, shutdown.clone()));

        let request = tokio::spawn(async move {
            send(&router, empty_request(Method::GET, "/Product?id=1")).await
        });

        let (id, responder) = expect_get_by_id(&mut rx).await.expect("Expected GetById");
        assert_eq!(id, 1);
        shutdown.cancel();

        let (status, body) = request.await.unwrap();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Repository operation cancelled"}));
        assert!(responder.is_closed());
    }
}
