//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::customer_handler;
use crate::domain::{
    CreateCustomerRequest, CustomerResponse, CustomerSearchResponse, UpdateCustomerRequest,
};

/// OpenAPI documentation for the customer service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Service",
        version = "0.1.0",
        description = "Customer record management: create, retrieve, update, and composable search",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        customer_handler::search_customers,
        customer_handler::get_customer,
        customer_handler::create_customer,
        customer_handler::update_customer,
    ),
    components(
        schemas(
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerResponse,
            CustomerSearchResponse,
        )
    ),
    tags(
        (name = "Customers", description = "Customer management operations")
    )
)]
pub struct ApiDoc;
