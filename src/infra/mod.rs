//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - The customer repository

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{CustomerRepository, CustomerStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockCustomerRepository;
