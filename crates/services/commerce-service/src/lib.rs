//! Commerce Service Library
//!
//! Catalog, order and user directory services over a PostgreSQL store.
//! Embedded by the HTTP gateway and the combined binary.

pub mod config;
pub mod container;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

pub use crate::config::CommerceServiceConfig;
pub use crate::container::{ServiceContainer, Services};
use crate::infra::Database;

#[cfg(any(test, feature = "test-utils"))]
pub use crate::container::MockServiceContainer;

/// Connect, apply pending migrations and build the services.
pub async fn connect(config: &CommerceServiceConfig) -> Result<Services, sea_orm::DbErr> {
    let db = Database::connect(&config.database).await?;
    Ok(Services::from_connection(db.get_connection()))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CommerceServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
