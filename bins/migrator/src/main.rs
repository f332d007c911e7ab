//! Database migration runner for Tally.
//!
//! Usage:
//!   migrator up      - Apply pending ledger migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show which migrations are applied
//!   migrator fresh   - Drop every table and re-apply the schema

use sea_orm_migration::prelude::*;
use tally_db::migration::Migrator;

#[tokio::main]
async fn main() {
    // DATABASE_URL may come from .env
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
