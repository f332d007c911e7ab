//! `SeaORM` entity definitions.

pub mod prelude;

pub mod detail_ledgers;
pub mod subsidiary_ledgers;
pub mod voucher_lines;
pub mod vouchers;
