//! Customer handlers.
//!
//! Thin glue: parse the request, call the service, shape the response.
//! All interesting decisions live in the domain layer.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{
    CreateCustomerRequest, CustomerDraft, CustomerResponse, CustomerSearchResponse,
    UpdateCustomerRequest,
};
use crate::errors::AppResult;

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer))
}

/// Search customers by query parameters
#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    params(
        ("name" = Option<String>, Query, description = "Partial match against first, last, or display name"),
        ("username" = Option<String>, Query, description = "Partial match against username"),
        ("email" = Option<String>, Query, description = "Partial match against email"),
        ("born_after" = Option<String>, Query, description = "Customers born on or after this date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Matching customers", body = CustomerSearchResponse),
        (status = 400, description = "No usable search criteria")
    )
)]
pub async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<CustomerSearchResponse>> {
    tracing::info!("/customers GET");

    let customers = state.customer_service.search_customers(&params).await?;

    Ok(Json(CustomerSearchResponse::from(customers)))
}

/// Retrieve a single customer
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "Customer identifier")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerResponse>> {
    tracing::info!("/customers/{} GET", id);

    let customer = state.customer_service.get_customer(id).await?;

    Ok(Json(CustomerResponse::from(customer)))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerResponse>)> {
    tracing::info!("/customers POST");

    let customer = state
        .customer_service
        .create_customer(CustomerDraft::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "Customer identifier")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<CustomerResponse>> {
    tracing::info!("/customers/{} PUT", id);

    let customer = state.customer_service.update_customer(id, payload).await?;

    Ok(Json(CustomerResponse::from(customer)))
}
