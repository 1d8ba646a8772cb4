//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all customer routes
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{
    enforce_timeout, propagate_request_id_layer, set_request_id_layer, trace_layer,
};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::store::SharedStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

/// HTTP server for the customer API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over `store`.
    pub fn new(config: ServiceConfig, store: SharedStore) -> Self {
        let state = AppState { store };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::index).fallback(handlers::method_not_allowed),
            )
            .route("/health", get(handlers::health))
            .route(
                "/customers",
                get(handlers::list_customers)
                    .post(handlers::create_customer)
                    .fallback(handlers::method_not_allowed),
            )
            .route(
                "/customers/{id}",
                get(handlers::get_customer)
                    .put(handlers::update_customer)
                    .delete(handlers::delete_customer)
                    .fallback(handlers::method_not_allowed),
            )
            .route(
                "/customers/{id}/suspend",
                put(handlers::suspend_customer).fallback(handlers::method_not_allowed),
            )
            .route_layer(middleware::from_fn(metrics::track_requests))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(config.timeouts.request_secs),
                enforce_timeout,
            ))
            .layer(propagate_request_id_layer())
            .layer(trace_layer())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{Customer, CustomerDraft, CustomerPatch, CustomerQuery};
    use crate::http::{ErrorBody, X_REQUEST_ID};
    use crate::store::{CustomerStore, MemoryCustomerStore, StoreError};

    /// Store whose lookups outlast any sane request timeout.
    struct SlowStore;

    #[async_trait]
    impl CustomerStore for SlowStore {
        async fn create(&self, _draft: CustomerDraft) -> Result<Customer, StoreError> {
            Err(StoreError::NotFound(0))
        }

        async fn find(&self, _id: i64) -> Result<Option<Customer>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn update(&self, id: i64, _patch: CustomerPatch) -> Result<Customer, StoreError> {
            Err(StoreError::NotFound(id))
        }

        async fn list(&self, _query: &CustomerQuery) -> Result<Vec<Customer>, StoreError> {
            Ok(Vec::new())
        }

        async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn suspend(&self, id: i64) -> Result<Customer, StoreError> {
            Err(StoreError::NotFound(id))
        }
    }

    fn server() -> HttpServer {
        let mut config = ServiceConfig::default();
        config.observability.metrics_enabled = false;
        HttpServer::new(config, Arc::new(MemoryCustomerStore::new()))
    }

    async fn error_body(response: axum::response::Response) -> ErrorBody {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_sets_location() {
        let body = r#"{"name":"Alice","address":"1 Main St","email":"a@x.com","phone":"555-1234","member_since":"2023-01-01"}"#;
        let response = server()
            .router()
            .oneshot(
                Request::post("/customers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/customers/1");
        let request_id = response.headers()[X_REQUEST_ID].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_method_is_json_405() {
        let response = server()
            .router()
            .oneshot(Request::patch("/customers/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = error_body(response).await;
        assert_eq!(body.status, 405);
        assert_eq!(body.message, "Method PATCH is not allowed on /customers/1");
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let response = server()
            .router()
            .oneshot(Request::get("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_body(response).await.status, 404);
    }

    #[tokio::test]
    async fn test_timeout_is_json_408() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_enabled = false;
        config.timeouts.request_secs = 1;
        let server = HttpServer::new(config, Arc::new(SlowStore));

        let response = server
            .router()
            .oneshot(Request::get("/customers/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let body = error_body(response).await;
        assert_eq!(body.status, 408);
        assert_eq!(body.message, "Request timed out");
    }

    #[tokio::test]
    async fn test_undecodable_id() {
        let server = server();

        let response = server
            .router()
            .oneshot(Request::get("/customers/%FF").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error_body(response).await.message,
            "Customer with id '%FF' was not found."
        );

        let response = server
            .router()
            .oneshot(Request::delete("/customers/%FF").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
