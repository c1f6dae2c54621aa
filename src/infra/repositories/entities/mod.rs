//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod customer;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use customer::{ActiveModel as CustomerActiveModel, Entity as CustomerEntity, Model as CustomerModel};
