//! Customer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Customer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Assigned by the repository at insert; never client-supplied
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub display_name: Option<String>,
    pub created_at: DateTimeUtc,
    pub birthdate: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Customer {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            display_name: model.display_name,
            created_at: model.created_at,
            birthdate: model.birthdate,
        }
    }
}
