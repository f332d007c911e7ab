//! Integration tests for the DL registry.

mod common;

use tally_core::ledger::{DeleteVoucherInput, LedgerError};
use tally_core::registry::{CreateDetailLedgerInput, UpdateDetailLedgerInput};
use tally_shared::ErrorKind;
use tally_shared::types::{DetailLedgerId, VoucherId};

use common::{create_chart, create_dl, setup, unique};

#[tokio::test]
async fn test_create_and_get_detail_ledger() {
    let (_db, repos) = setup().await;

    let created = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: "DL-100".to_string(),
            title: "Acme Corp".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(created.version, 0);
    let fetched = repos
        .detail_ledgers
        .get_detail_ledger(DetailLedgerId::new(created.id))
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_rejects_invalid_lengths() {
    let (_db, repos) = setup().await;

    let result = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: String::new(),
            title: "Title".to_string(),
        })
        .await;
    assert_eq!(result.unwrap_err(), LedgerError::CodeEmptyOrTooLong);

    let result = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: unique("DL"),
            title: "t".repeat(65),
        })
        .await;
    assert_eq!(result.unwrap_err(), LedgerError::TitleEmptyOrTooLong);
}

#[tokio::test]
async fn test_create_rejects_duplicates_code_first() {
    let (_db, repos) = setup().await;
    let existing = create_dl(&repos).await;
    let other = create_dl(&repos).await;

    // Code clashes with one record, title with another.
    let result = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: existing.code.clone(),
            title: other.title.clone(),
        })
        .await;
    assert_eq!(result.unwrap_err(), LedgerError::CodeAlreadyExists);

    let result = repos
        .detail_ledgers
        .create_detail_ledger(CreateDetailLedgerInput {
            code: unique("DL"),
            title: existing.title.clone(),
        })
        .await;
    let err = result.unwrap_err();
    assert_eq!(err, LedgerError::TitleAlreadyExists);
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_update_bumps_version_once() {
    let (_db, repos) = setup().await;
    let dl = create_dl(&repos).await;
    let id = DetailLedgerId::new(dl.id);

    let updated = repos
        .detail_ledgers
        .update_detail_ledger(UpdateDetailLedgerInput {
            id,
            code: dl.code.clone(),
            title: "Renamed".to_string(),
            version: 0,
        })
        .await
        .unwrap();
    assert_eq!(updated.version, 1);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.code, dl.code);

    let stale = repos
        .detail_ledgers
        .update_detail_ledger(UpdateDetailLedgerInput {
            id,
            code: dl.code.clone(),
            title: "Renamed again".to_string(),
            version: 0,
        })
        .await;
    assert_eq!(stale.unwrap_err(), LedgerError::VersionOutdated { expected: 0 });
}

#[tokio::test]
async fn test_update_uniqueness_excludes_self() {
    let (_db, repos) = setup().await;
    let dl = create_dl(&repos).await;
    let other = create_dl(&repos).await;

    let clash = repos
        .detail_ledgers
        .update_detail_ledger(UpdateDetailLedgerInput {
            id: DetailLedgerId::new(dl.id),
            code: other.code.clone(),
            title: dl.title.clone(),
            version: 0,
        })
        .await;
    assert_eq!(clash.unwrap_err(), LedgerError::CodeAlreadyExists);

    let same = repos
        .detail_ledgers
        .update_detail_ledger(UpdateDetailLedgerInput {
            id: DetailLedgerId::new(dl.id),
            code: dl.code.clone(),
            title: dl.title.clone(),
            version: 0,
        })
        .await
        .unwrap();
    assert_eq!(same.version, 1);
}

#[tokio::test]
async fn test_update_missing_detail_ledger() {
    let (_db, repos) = setup().await;
    let id = DetailLedgerId::new(77);

    let result = repos
        .detail_ledgers
        .update_detail_ledger(UpdateDetailLedgerInput {
            id,
            code: unique("DL"),
            title: unique("Detail"),
            version: 0,
        })
        .await;

    assert_eq!(result.unwrap_err(), LedgerError::DetailLedgerNotFound(id));
}

#[tokio::test]
async fn test_delete_referenced_detail_ledger_after_voucher_removed() {
    let (_db, repos) = setup().await;
    let chart = create_chart(&repos).await;
    let voucher = repos.vouchers.create_voucher(chart.voucher(100)).await.unwrap();

    let blocked = repos
        .detail_ledgers
        .delete_detail_ledger(chart.customer_id(), 0)
        .await
        .unwrap_err();
    assert_eq!(blocked, LedgerError::ReferencedByVoucherLine);
    assert_eq!(blocked.kind(), ErrorKind::Referential);

    repos
        .vouchers
        .delete_voucher(DeleteVoucherInput {
            id: VoucherId::new(voucher.voucher.id),
            version: 0,
        })
        .await
        .unwrap();

    repos
        .detail_ledgers
        .delete_detail_ledger(chart.customer_id(), 0)
        .await
        .unwrap();

    assert_eq!(
        repos
            .detail_ledgers
            .get_detail_ledger(chart.customer_id())
            .await
            .unwrap_err(),
        LedgerError::DetailLedgerNotFound(chart.customer_id())
    );
}

#[tokio::test]
async fn test_delete_checks_version() {
    let (_db, repos) = setup().await;
    let dl = create_dl(&repos).await;
    let id = DetailLedgerId::new(dl.id);

    let stale = repos.detail_ledgers.delete_detail_ledger(id, 5).await;
    assert_eq!(stale.unwrap_err(), LedgerError::VersionOutdated { expected: 5 });

    repos.detail_ledgers.delete_detail_ledger(id, 0).await.unwrap();

    let missing = repos.detail_ledgers.delete_detail_ledger(id, 0).await;
    assert_eq!(missing.unwrap_err(), LedgerError::DetailLedgerNotFound(id));
}
