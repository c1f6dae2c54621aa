//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{CustomerService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Customer service
    pub customer_service: Arc<dyn CustomerService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the application state for a live database connection.
    pub fn from_database(database: Arc<Database>) -> Self {
        let container = Services::from_connection(database.get_connection());

        Self {
            customer_service: container.customers(),
            database,
        }
    }
}
