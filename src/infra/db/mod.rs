//! Postgres access for the customer store.
//!
//! Wraps the SeaORM connection and the schema migrations behind one type so
//! the serve and migrate commands share a single connect path. Connection
//! failures surface as ordinary errors; callers decide how to exit.

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::errors::AppResult;

pub mod migrations;

pub use migrations::Migrator;

/// Handle to the customer store.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and bring the schema up to date.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let db = Self::connect_without_migrations(config).await?;
        db.run_migrations().await?;
        tracing::info!("Database connected, schema up to date");
        Ok(db)
    }

    /// Connect without touching the schema.
    ///
    /// The migrate command connects this way and picks its own action.
    pub async fn connect_without_migrations(config: &Config) -> AppResult<Self> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    /// Get a clone of the underlying connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.connection, None).await?;
        Ok(())
    }

    /// Roll back the most recent migration.
    pub async fn rollback_migration(&self) -> AppResult<()> {
        Migrator::down(&self.connection, Some(1)).await?;
        Ok(())
    }

    /// List every known migration with its applied/pending state.
    pub async fn migration_status(&self) -> AppResult<Vec<(String, bool)>> {
        use sea_orm::{EntityTrait, QueryOrder};
        use sea_orm_migration::seaql_migrations;

        let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop everything and re-run every migration.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        Migrator::fresh(&self.connection).await?;
        Ok(())
    }

    /// Connectivity check for the health endpoint.
    ///
    /// Returns the raw database error so the endpoint can report it.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn connect_surfaces_a_bad_url_as_an_error() {
        let config = Config {
            database_url: "not-a-database-url".to_string(),
        };

        let result = Database::connect_without_migrations(&config).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
