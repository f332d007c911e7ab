//! Property-based tests for ledger validation.
//!
//! - Single-sided lines: exactly one of debit/credit is strictly positive
//! - Field length: 1..=64 characters, counted as Unicode scalar values

use proptest::prelude::*;

use super::error::LedgerError;
use super::validation::{
    is_valid_length, validate_code_and_title, validate_debit_credit, validate_line_count,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_debit_credit_xor(debit in any::<i64>(), credit in any::<i64>()) {
        let expected = ((debit > 0) ^ (credit > 0)) && debit >= 0 && credit >= 0;
        prop_assert_eq!(validate_debit_credit(debit, credit).is_ok(), expected);
    }

    #[test]
    fn prop_single_sided_always_valid(amount in 1i64..=i64::MAX) {
        prop_assert!(validate_debit_credit(amount, 0).is_ok());
        prop_assert!(validate_debit_credit(0, amount).is_ok());
        prop_assert_eq!(
            validate_debit_credit(amount, amount),
            Err(LedgerError::DebitOrCreditInvalid)
        );
    }

    #[test]
    fn prop_short_fields_valid(value in "\\PC{1,64}") {
        prop_assert!(is_valid_length(&value));
    }

    #[test]
    fn prop_long_fields_invalid(value in "\\PC{65,100}") {
        prop_assert!(!is_valid_length(&value));
        prop_assert_eq!(
            validate_code_and_title(&value, "Title"),
            Err(LedgerError::CodeEmptyOrTooLong)
        );
        prop_assert_eq!(
            validate_code_and_title("CODE", &value),
            Err(LedgerError::TitleEmptyOrTooLong)
        );
    }

    #[test]
    fn prop_line_count_range(count in -10i64..1_000) {
        let ok = validate_line_count(count).is_ok();
        prop_assert_eq!(ok, (2..=500).contains(&count));
    }
}
