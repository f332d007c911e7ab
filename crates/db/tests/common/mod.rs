//! Shared fixtures for the repository integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tally_core::ledger::{CreateVoucherInput, VoucherLineInput};
use tally_core::registry::{CreateDetailLedgerInput, CreateSubsidiaryLedgerInput};
use tally_db::entities::{detail_ledgers, subsidiary_ledgers};
use tally_db::migration::Migrator;
use tally_db::LedgerRepositories;
use tally_shared::LedgerConfig;
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Returns a process-unique suffix for codes, titles and numbers.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Opens a fresh in-memory database with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Builds repositories over a fresh database.
pub async fn setup() -> (DatabaseConnection, LedgerRepositories) {
    let db = setup_db().await;
    let repos = LedgerRepositories::new(db.clone(), &LedgerConfig::default());
    (db, repos)
}

/// A typical chart: cash (no DL), receivables (DL required) and one customer DL.
pub struct Chart {
    pub cash: subsidiary_ledgers::Model,
    pub receivables: subsidiary_ledgers::Model,
    pub customer: detail_ledgers::Model,
}

impl Chart {
    pub fn cash_id(&self) -> SubsidiaryLedgerId {
        SubsidiaryLedgerId::new(self.cash.id)
    }

    pub fn receivables_id(&self) -> SubsidiaryLedgerId {
        SubsidiaryLedgerId::new(self.receivables.id)
    }

    pub fn customer_id(&self) -> DetailLedgerId {
        DetailLedgerId::new(self.customer.id)
    }

    /// Debit cash, credit receivables for the customer.
    pub fn balanced_lines(&self, amount: i64) -> Vec<VoucherLineInput> {
        vec![
            VoucherLineInput::debit(self.cash_id(), amount),
            VoucherLineInput::credit(self.receivables_id(), amount).with_detail(self.customer_id()),
        ]
    }

    /// A balanced two-line voucher with a unique number.
    pub fn voucher(&self, amount: i64) -> CreateVoucherInput {
        CreateVoucherInput {
            number: unique("V"),
            lines: self.balanced_lines(amount),
        }
    }
}

pub async fn create_sl(
    repos: &LedgerRepositories,
    requires_detail: bool,
) -> subsidiary_ledgers::Model {
    repos
        .subsidiary_ledgers
        .create_subsidiary_ledger(CreateSubsidiaryLedgerInput {
            code: unique("SL"),
            title: unique("Subsidiary"),
            requires_detail,
        })
        .await
        .expect("Failed to create SL")
}

pub async fn create_dl(repos: &LedgerRepositories) -> detail_ledgers::Model {
    repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: unique("DL"),
            title: unique("Detail"),
        })
        .await
        .expect("Failed to create DL")
}

pub async fn create_chart(repos: &LedgerRepositories) -> Chart {
    Chart {
        cash: create_sl(repos, false).await,
        receivables: create_sl(repos, true).await,
        customer: create_dl(repos).await,
    }
}
