//! Entity re-exports.

pub use super::detail_ledgers::Entity as DetailLedgers;
pub use super::subsidiary_ledgers::Entity as SubsidiaryLedgers;
pub use super::voucher_lines::Entity as VoucherLines;
pub use super::vouchers::Entity as Vouchers;
