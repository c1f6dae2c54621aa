//! Service Container - Centralized service access.
//!
//! Manages service lifecycle and access; depends on service traits,
//! not implementations. Thread-safe concurrent access via Arc.

use std::sync::Arc;

use super::{CustomerManager, CustomerService};
use crate::infra::CustomerStore;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get customer service
    fn customers(&self) -> Arc<dyn CustomerService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    customer_service: Arc<dyn CustomerService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(customer_service: Arc<dyn CustomerService>) -> Self {
        Self { customer_service }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        let repo = Arc::new(CustomerStore::new(db));
        let customer_service = Arc::new(CustomerManager::new(repo));

        Self { customer_service }
    }
}

impl ServiceContainer for Services {
    fn customers(&self) -> Arc<dyn CustomerService> {
        self.customer_service.clone()
    }
}
