//! Customer resource handlers.
//!
//! Each handler validates its input before touching the store, so a rejected
//! request never reaches the database.

use axum::{
    extract::{OriginalUri, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::error::ApiError;
use super::extract::{JsonBody, PathId, QueryParams};
use super::server::AppState;
use crate::domain::{Customer, CustomerChanges, CustomerQuery, ListParams, NewCustomer};

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": 200, "message": "Healthy" }))
}

/// `GET /`
pub async fn index() -> impl IntoResponse {
    tracing::debug!("Request for root URL");
    Json(json!({
        "name": "Customer Service REST API",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": "/customers",
    }))
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed(format!(
        "Method {} is not allowed on {}",
        method,
        uri.path()
    ))
}

/// Fallback for unknown paths.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("The requested URL {} was not found on this server.", uri.path()))
}

/// `POST /customers`
pub async fn create_customer(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewCustomer>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Request to create a customer");
    let draft = body.validate()?;

    let customer = state
        .store
        .create(draft)
        .await
        .map_err(|e| ApiError::from_store("create", e))?;

    tracing::info!(customer_id = customer.id, "Customer created");
    let location = format!("/customers/{}", customer.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(customer)))
}

/// `GET /customers/{id}`
pub async fn get_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Customer>, ApiError> {
    tracing::info!(customer_id = id, "Request to retrieve a customer");

    state
        .store
        .find(id)
        .await
        .map_err(|e| ApiError::from_store("find", e))?
        .map(Json)
        .ok_or_else(|| ApiError::CustomerNotFound(id.to_string()))
}

/// `PUT /customers/{id}`
pub async fn update_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<CustomerChanges>,
) -> Result<Json<Customer>, ApiError> {
    tracing::info!(customer_id = id, "Request to update a customer");
    let patch = body.validate()?;

    let customer = state
        .store
        .update(id, patch)
        .await
        .map_err(|e| ApiError::from_store("update", e))?;

    tracing::info!(customer_id = id, "Customer updated");
    Ok(Json(customer))
}

/// `GET /customers`
pub async fn list_customers(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let query = CustomerQuery::try_from(params)?;
    tracing::info!(filters = ?query, "Request for customer list");

    let customers = state
        .store
        .list(&query)
        .await
        .map_err(|e| ApiError::from_store("list", e))?;

    tracing::info!(count = customers.len(), "Returning customers");
    Ok(Json(customers))
}

/// `DELETE /customers/{id}`. Succeeds whether or not the customer existed.
pub async fn delete_customer(
    State(state): State<AppState>,
    id: Result<PathId, ApiError>,
) -> Result<StatusCode, ApiError> {
    let Ok(PathId(id)) = id else {
        tracing::info!("Delete of an id that cannot exist");
        return Ok(StatusCode::NO_CONTENT);
    };
    tracing::info!(customer_id = id, "Request to delete a customer");

    let removed = state
        .store
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store("delete", e))?;

    tracing::info!(customer_id = id, removed, "Customer delete complete");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /customers/{id}/suspend`
pub async fn suspend_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Customer>, ApiError> {
    tracing::info!(customer_id = id, "Request to suspend a customer");

    let customer = state
        .store
        .suspend(id)
        .await
        .map_err(|e| ApiError::from_store("suspend", e))?;

    tracing::info!(customer_id = id, "Customer suspended");
    Ok(Json(customer))
}
