//! Migration: Create the customers table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Username).string_len(100).null())
                    .col(ColumnDef::new(Customers::Email).string_len(100).null())
                    .col(ColumnDef::new(Customers::FirstName).string_len(25).null())
                    .col(ColumnDef::new(Customers::LastName).string_len(25).not_null())
                    .col(ColumnDef::new(Customers::DisplayName).string_len(60).null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Customers::Birthdate).date().null())
                    .to_owned(),
            )
            .await?;

        // Store-level uniqueness constraints. The validation pipeline's
        // uniqueness probe is a fast-reject in front of these; two racing
        // creations are ultimately arbitrated here.
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_username_unique")
                    .table(Customers::Table)
                    .col(Customers::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_email_unique")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    DisplayName,
    CreatedAt,
    Birthdate,
}
