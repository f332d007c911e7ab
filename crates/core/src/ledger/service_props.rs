//! Property-based tests for LedgerService.
//!
//! - Balance integrity on create
//! - Delta equivalence: the update delta check accepts iff the fully
//!   materialized voucher is balanced
//! - Version conflicts are always rejected

use proptest::prelude::*;
use tally_shared::types::{DetailLedgerId, SubsidiaryLedgerId, VoucherId, VoucherLineId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{
    CreateVoucherInput, PersistedLine, SubsidiaryLedgerInfo, UpdateVoucherInput,
    VoucherLineChanges, VoucherLineInput, VoucherLineUpdate, VoucherState, VoucherTotals,
};

const CASH: SubsidiaryLedgerId = SubsidiaryLedgerId(1);

fn sl_lookup(id: SubsidiaryLedgerId) -> Option<SubsidiaryLedgerInfo> {
    (id == CASH).then_some(SubsidiaryLedgerInfo {
        id,
        requires_detail: false,
    })
}

fn no_dl(_id: DetailLedgerId) -> bool {
    false
}

/// What happens to a persisted line in a generated change set.
#[derive(Debug, Clone)]
enum LineAction {
    Keep,
    Update(i64, i64),
    Delete,
}

/// Strategy to generate a single-sided `(debit, credit)` pair.
fn single_sided() -> impl Strategy<Value = (i64, i64)> {
    (1i64..1_000_000, any::<bool>()).prop_map(|(amount, is_debit)| {
        if is_debit { (amount, 0) } else { (0, amount) }
    })
}

fn line_action() -> impl Strategy<Value = LineAction> {
    prop_oneof![
        Just(LineAction::Keep),
        single_sided().prop_map(|(debit, credit)| LineAction::Update(debit, credit)),
        Just(LineAction::Delete),
    ]
}

fn to_input((debit, credit): (i64, i64)) -> VoucherLineInput {
    VoucherLineInput {
        sl_id: CASH,
        dl_id: None,
        debit,
        credit,
    }
}

/// Strategy to generate a balanced voucher of debit/credit pairs.
fn balanced_state() -> impl Strategy<Value = VoucherState> {
    prop::collection::vec(1i64..1_000_000, 1..20).prop_map(|amounts| {
        let lines = amounts
            .iter()
            .zip(1i64..)
            .flat_map(|(&amount, pair)| {
                [
                    PersistedLine {
                        id: VoucherLineId::new(pair * 2 - 1),
                        debit: amount,
                        credit: 0,
                    },
                    PersistedLine {
                        id: VoucherLineId::new(pair * 2),
                        debit: 0,
                        credit: amount,
                    },
                ]
            })
            .collect();
        VoucherState {
            id: VoucherId::new(1),
            version: 0,
            lines,
        }
    })
}

fn update_scenario()
-> impl Strategy<Value = (VoucherState, Vec<LineAction>, Vec<(i64, i64)>)> {
    balanced_state().prop_flat_map(|state| {
        let n = state.lines.len();
        (
            Just(state),
            prop::collection::vec(line_action(), n),
            prop::collection::vec(single_sided(), 0..6),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Vouchers built from matching debit/credit pairs are accepted, and
    /// the returned totals equal the pair sum on both sides.
    #[test]
    fn prop_balanced_create_accepted(
        amounts in prop::collection::vec(1i64..1_000_000, 1..250),
    ) {
        let lines: Vec<_> = amounts
            .iter()
            .flat_map(|&a| [to_input((a, 0)), to_input((0, a))])
            .collect();
        let input = CreateVoucherInput { number: "V-1".to_string(), lines };

        let totals = LedgerService::validate_create(&input, false, sl_lookup, no_dl).unwrap();

        let expected: i128 = amounts.iter().map(|&a| i128::from(a)).sum();
        prop_assert_eq!(totals, VoucherTotals::new(expected, expected));
    }

    /// Any imbalance on create is rejected with the exact sums.
    #[test]
    fn prop_unbalanced_create_rejected(
        debit in 1i64..1_000_000,
        credit in 1i64..1_000_000,
    ) {
        prop_assume!(debit != credit);
        let input = CreateVoucherInput {
            number: "V-1".to_string(),
            lines: vec![to_input((debit, 0)), to_input((0, credit))],
        };

        let result = LedgerService::validate_create(&input, false, sl_lookup, no_dl);

        prop_assert_eq!(
            result,
            Err(LedgerError::DebitCreditMismatch {
                debit: i128::from(debit),
                credit: i128::from(credit),
            })
        );
    }

    /// The delta check agrees with recomputing totals over the result.
    #[test]
    fn prop_delta_matches_materialized_balance(
        (state, actions, inserted) in update_scenario(),
    ) {
        let mut changes = VoucherLineChanges {
            inserted: inserted.iter().copied().map(to_input).collect(),
            ..VoucherLineChanges::default()
        };
        let mut materialized = VoucherTotals::default();
        let mut count = inserted.len();

        for (line, action) in state.lines.iter().zip(&actions) {
            match *action {
                LineAction::Keep => {
                    materialized.add(line.debit, line.credit);
                    count += 1;
                }
                LineAction::Update(debit, credit) => {
                    changes.updated.push(VoucherLineUpdate {
                        id: line.id,
                        line: to_input((debit, credit)),
                    });
                    materialized.add(debit, credit);
                    count += 1;
                }
                LineAction::Delete => changes.deleted.push(line.id),
            }
        }
        for &(debit, credit) in &inserted {
            materialized.add(debit, credit);
        }

        let input = UpdateVoucherInput {
            id: state.id,
            version: state.version,
            number: "V-1".to_string(),
            lines: changes,
        };
        let result = LedgerService::validate_update(&input, Some(&state), false, sl_lookup, no_dl);

        if !(2..=500).contains(&count) {
            let out_of_range = matches!(result, Err(LedgerError::ItemsCountOutOfRange(_)));
            prop_assert!(out_of_range, "expected count error, got {:?}", result);
        } else if materialized.is_balanced() {
            prop_assert!(result.is_ok(), "expected Ok, got {:?}", result);
        } else {
            let mismatch = matches!(result, Err(LedgerError::DebitCreditMismatch { .. }));
            prop_assert!(mismatch, "expected mismatch, got {:?}", result);
        }
    }

    /// A stale version is rejected before any line is looked at.
    #[test]
    fn prop_stale_version_rejected(
        state in balanced_state(),
        stale in 1i64..100,
    ) {
        let input = UpdateVoucherInput {
            id: state.id,
            version: state.version + stale,
            number: "V-1".to_string(),
            lines: VoucherLineChanges {
                deleted: vec![VoucherLineId::new(-1)],
                ..VoucherLineChanges::default()
            },
        };

        let result = LedgerService::validate_update(&input, Some(&state), false, sl_lookup, no_dl);

        prop_assert_eq!(
            result,
            Err(LedgerError::VersionOutdated { expected: state.version + stale })
        );
    }
}
