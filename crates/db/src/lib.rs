//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for the DL/SL registries and the voucher engine
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    DetailLedgerRepository, LedgerRepositories, SubsidiaryLedgerRepository, VoucherRepository,
    VoucherWithLines,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_shared::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection tuned by `config`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout())
        .max_lifetime(config.max_lifetime())
        .sqlx_logging(config.sqlx_logging);

    Database::connect(options).await
}
