//! Customer repository implementation.
//!
//! Translates the domain's tagged search filters into SeaORM conditions and
//! maps store-level unique-index violations onto the same conflict outcome
//! the validation pipeline produces.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::customer::{self, ActiveModel, Entity as CustomerEntity};
use crate::domain::search::{DateField, Filter, SearchCriteria, TextField};
use crate::domain::validation::UniqueField;
use crate::domain::{Customer, CustomerDraft};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Customer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>>;

    /// Find all customers matching the combined search criteria
    async fn search(&self, criteria: &SearchCriteria) -> AppResult<Vec<Customer>>;

    /// True when another stored record (not `exclude`) already holds `value`
    /// in the given unique field
    async fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool>;

    /// Persist a validated, defaulted draft; assigns the id
    async fn insert(&self, draft: CustomerDraft) -> AppResult<Customer>;

    /// Overwrite the mutable fields of a stored customer.
    ///
    /// `id` and `created_at` of the stored row are never altered.
    async fn update(&self, record: Customer) -> AppResult<Customer>;
}

/// Concrete implementation of CustomerRepository
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let result = CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Customer::from))
    }

    async fn search(&self, criteria: &SearchCriteria) -> AppResult<Vec<Customer>> {
        let mut condition = Condition::all();
        for filter in criteria.filters() {
            condition = condition.add(filter_condition(filter));
        }

        let models = CustomerEntity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Customer::from).collect())
    }

    async fn exists_with(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let column = match field {
            UniqueField::Username => customer::Column::Username,
            UniqueField::Email => customer::Column::Email,
        };

        let mut query = CustomerEntity::find().filter(column.eq(value));
        if let Some(id) = exclude {
            query = query.filter(customer::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(AppError::from)?;
        Ok(count > 0)
    }

    async fn insert(&self, draft: CustomerDraft) -> AppResult<Customer> {
        // The pipeline guarantees these before any draft reaches the store
        let last_name = draft
            .last_name
            .ok_or_else(|| AppError::internal("insert called with unvalidated draft: no last_name"))?;
        let created_at = draft
            .created_at
            .ok_or_else(|| AppError::internal("insert called with undefaulted draft: no created_at"))?;

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(draft.username),
            email: Set(draft.email),
            first_name: Set(draft.first_name),
            last_name: Set(last_name),
            display_name: Set(draft.display_name),
            created_at: Set(created_at),
            birthdate: Set(draft.birthdate),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_unique_violation)?;

        Ok(Customer::from(model))
    }

    async fn update(&self, record: Customer) -> AppResult<Customer> {
        let stored = CustomerEntity::find_by_id(record.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = stored.into();
        active.username = Set(record.username);
        active.email = Set(record.email);
        active.first_name = Set(record.first_name);
        active.last_name = Set(record.last_name);
        active.display_name = Set(record.display_name);
        active.birthdate = Set(record.birthdate);
        // id and created_at stay as stored

        let model = active.update(&self.db).await.map_err(map_unique_violation)?;

        Ok(Customer::from(model))
    }
}

/// Translate one domain filter into a SeaORM condition.
fn filter_condition(filter: &Filter) -> Condition {
    match filter {
        Filter::SubstringMatch { field, value } => {
            let pattern = like_pattern(value);
            match field {
                // Any one of the three name fields may carry the match
                TextField::Name => Condition::any()
                    .add(ci_like(customer::Column::FirstName, &pattern))
                    .add(ci_like(customer::Column::LastName, &pattern))
                    .add(ci_like(customer::Column::DisplayName, &pattern)),
                TextField::Username => {
                    Condition::all().add(ci_like(customer::Column::Username, &pattern))
                }
                TextField::Email => Condition::all().add(ci_like(customer::Column::Email, &pattern)),
            }
        }
        Filter::DateAtOrAfter { field, value } => match field {
            DateField::Birthdate => {
                Condition::all().add(customer::Column::Birthdate.gte(*value))
            }
        },
    }
}

/// Case-insensitive LIKE, lower-casing the column rather than relying on
/// store collation.
fn ci_like(column: customer::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

/// Build a `%...%` pattern for literal substring containment.
///
/// LIKE metacharacters in the search value are escaped so user input never
/// acts as a wildcard.
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Map a unique-index violation to the same conflict outcome the validation
/// pipeline's own uniqueness check produces; everything else stays a
/// database error.
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            AppError::conflict(conflicted_field(&detail))
        }
        _ => AppError::from(err),
    }
}

fn conflicted_field(detail: &str) -> &'static str {
    if detail.contains("username") {
        "username"
    } else if detail.contains("email") {
        "email"
    } else {
        "customer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("step"), "%step%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[test]
    fn like_pattern_lowercases_the_search_value() {
        assert_eq!(like_pattern("StepheN"), "%stephen%");
    }

    #[test]
    fn conflicted_field_names_the_unique_column() {
        assert_eq!(conflicted_field("duplicate key value violates unique constraint \"idx_customers_username_unique\""), "username");
        assert_eq!(conflicted_field("duplicate key value violates unique constraint \"idx_customers_email_unique\""), "email");
        assert_eq!(conflicted_field("something else"), "customer");
    }
}
