//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod customer_repository;
pub(crate) mod entities;

pub use customer_repository::{CustomerRepository, CustomerStore};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
