//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod detail_ledger;
mod registry;
pub mod subsidiary_ledger;
mod support;
pub mod voucher;

pub use detail_ledger::DetailLedgerRepository;
pub use subsidiary_ledger::SubsidiaryLedgerRepository;
pub use voucher::{VoucherRepository, VoucherWithLines};

use sea_orm::DatabaseConnection;
use tally_shared::LedgerConfig;

/// The three ledger repositories sharing one connection pool.
#[derive(Debug, Clone)]
pub struct LedgerRepositories {
    /// DL registry.
    pub detail_ledgers: DetailLedgerRepository,
    /// SL registry.
    pub subsidiary_ledgers: SubsidiaryLedgerRepository,
    /// Voucher engine.
    pub vouchers: VoucherRepository,
}

impl LedgerRepositories {
    /// Builds all repositories over `db` with the configured deadline.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        let timeout = config.operation_timeout();
        Self {
            detail_ledgers: DetailLedgerRepository::new(db.clone()).with_timeout(timeout),
            subsidiary_ledgers: SubsidiaryLedgerRepository::new(db.clone()).with_timeout(timeout),
            vouchers: VoucherRepository::new(db).with_timeout(timeout),
        }
    }
}
