//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns:
//! the Customer entity, the composable search criteria, and the
//! validation/defaulting pipeline that guards persistence.

pub mod customer;
pub mod search;
pub mod validation;

pub use customer::{
    CreateCustomerRequest, Customer, CustomerDraft, CustomerResponse, CustomerSearchResponse,
    UpdateCustomerRequest,
};
pub use search::{DateField, EmptySearch, Filter, SearchCriteria, TextField};
pub use validation::{UniqueField, UniquenessProbe, Violation, Violations};
