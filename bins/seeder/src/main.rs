//! Database seeder for Tally development and testing.
//!
//! Seeds a small chart of ledgers and one balanced opening voucher through the
//! ledger repositories.
//!
//! Usage: cargo run --bin seeder

use tally_core::ledger::{CreateVoucherInput, LedgerError, VoucherLineInput};
use tally_core::registry::{CreateDetailLedgerInput, CreateSubsidiaryLedgerInput};
use tally_db::{LedgerRepositories, connect_with};
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId};
use tally_shared::{AppConfig, ErrorKind};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Opening balance moved from equity into cash and receivables.
const OPENING_CASH: i64 = 250_000;
const OPENING_RECEIVABLE: i64 = 75_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,sea_orm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    info!("Connecting to database");
    let db = connect_with(&config.database).await?;
    let repos = LedgerRepositories::new(db, &config.ledger);

    match seed(&repos).await {
        Ok(()) => info!("Seeding complete"),
        Err(err) if err.kind() == ErrorKind::Conflict => {
            info!(error = %err, "Chart already seeded, skipping");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

async fn seed(repos: &LedgerRepositories) -> Result<(), LedgerError> {
    info!("Seeding detail ledgers");
    let customer = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: "CUST-001".to_string(),
            title: "Acme Trading".to_string(),
        })
        .await?;

    info!("Seeding subsidiary ledgers");
    let cash = create_subsidiary(repos, "1000", "Cash on Hand", false).await?;
    let receivables = create_subsidiary(repos, "1100", "Accounts Receivable", true).await?;
    let equity = create_subsidiary(repos, "3000", "Owner Equity", false).await?;

    info!("Seeding opening voucher");
    let voucher = repos
        .vouchers
        .create_voucher(CreateVoucherInput {
            number: "OPEN-0001".to_string(),
            lines: vec![
                VoucherLineInput::debit(cash, OPENING_CASH),
                VoucherLineInput::debit(receivables, OPENING_RECEIVABLE)
                    .with_detail(DetailLedgerId::new(customer.id)),
                VoucherLineInput::credit(equity, OPENING_CASH + OPENING_RECEIVABLE),
            ],
        })
        .await?;

    info!(
        voucher_id = voucher.voucher.id,
        lines = voucher.lines.len(),
        "Opening voucher created"
    );
    Ok(())
}

async fn create_subsidiary(
    repos: &LedgerRepositories,
    code: &str,
    title: &str,
    requires_detail: bool,
) -> Result<SubsidiaryLedgerId, LedgerError> {
    let model = repos
        .subsidiary_ledgers
        .create_subsidiary_ledger(CreateSubsidiaryLedgerInput {
            code: code.to_string(),
            title: title.to_string(),
            requires_detail,
        })
        .await?;
    Ok(SubsidiaryLedgerId::new(model.id))
}
