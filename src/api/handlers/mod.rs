//! HTTP request handlers.

pub mod customer_handler;

pub use customer_handler::customer_routes;
