//! Customer service - Handles customer-related business logic.
//!
//! Orchestrates the two core subsystems around the repository: the search
//! criteria composer for reads and the validation/defaulting pipeline for
//! writes. The sequencing contract for writes is fixed: validate fully,
//! then default, then persist.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::search::SearchCriteria;
use crate::domain::validation::{self, UniqueField, UniquenessProbe};
use crate::domain::{Customer, CustomerDraft, UpdateCustomerRequest};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::CustomerRepository;

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Get customer by ID
    async fn get_customer(&self, id: Uuid) -> AppResult<Customer>;

    /// Search customers by raw query parameters.
    ///
    /// Zero usable criteria is a client error, never a full scan.
    async fn search_customers(&self, params: &HashMap<String, String>) -> AppResult<Vec<Customer>>;

    /// Validate, default, and persist a new customer
    async fn create_customer(&self, draft: CustomerDraft) -> AppResult<Customer>;

    /// Update a stored customer from the bounded mutable field set
    async fn update_customer(
        &self,
        id: Uuid,
        changes: UpdateCustomerRequest,
    ) -> AppResult<Customer>;
}

/// Concrete implementation of CustomerService.
pub struct CustomerManager {
    repo: Arc<dyn CustomerRepository>,
}

impl CustomerManager {
    /// Create new customer service instance
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { repo }
    }

    fn probe(&self) -> RepositoryProbe {
        RepositoryProbe {
            repo: self.repo.clone(),
        }
    }
}

/// Adapter exposing the repository lookup as the pipeline's uniqueness probe.
struct RepositoryProbe {
    repo: Arc<dyn CustomerRepository>,
}

#[async_trait]
impl UniquenessProbe for RepositoryProbe {
    async fn is_taken(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        self.repo.exists_with(field, value, exclude).await
    }
}

#[async_trait]
impl CustomerService for CustomerManager {
    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn search_customers(&self, params: &HashMap<String, String>) -> AppResult<Vec<Customer>> {
        let criteria = SearchCriteria::compose(params)?;
        tracing::debug!("searching with {} filter(s)", criteria.filters().len());
        self.repo.search(&criteria).await
    }

    async fn create_customer(&self, draft: CustomerDraft) -> AppResult<Customer> {
        let probe = self.probe();
        let defaulted = validation::validate_and_default(draft, &probe, Utc::now()).await?;

        // The store's unique indexes arbitrate any race that slipped past
        // the probe; the repository maps that to the same conflict outcome.
        let created = self.repo.insert(defaulted).await?;
        tracing::info!(id = %created.id, "customer created");
        Ok(created)
    }

    async fn update_customer(
        &self,
        id: Uuid,
        changes: UpdateCustomerRequest,
    ) -> AppResult<Customer> {
        let stored = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        // Merge: only the bounded field set is overwritten, absent payload
        // fields keep their stored values.
        let mut merged = CustomerDraft::from(stored.clone());
        if changes.first_name.is_some() {
            merged.first_name = changes.first_name;
        }
        if changes.last_name.is_some() {
            merged.last_name = changes.last_name;
        }
        if changes.email.is_some() {
            merged.email = changes.email;
        }
        if changes.username.is_some() {
            merged.username = changes.username;
        }

        let probe = self.probe();
        validation::validate(&merged, &probe, Some(id), Utc::now()).await?;

        // Re-run the display_name trigger only; created_at is never re-stamped
        validation::default_display_name(&mut merged);

        let last_name = merged
            .last_name
            .ok_or_else(|| AppError::internal("validated draft lost its last_name"))?;

        let record = Customer {
            id: stored.id,
            username: merged.username,
            email: merged.email,
            first_name: merged.first_name,
            last_name,
            display_name: merged.display_name,
            created_at: stored.created_at,
            birthdate: merged.birthdate,
        };

        let updated = self.repo.update(record).await?;
        tracing::info!(id = %updated.id, "customer updated");
        Ok(updated)
    }
}
