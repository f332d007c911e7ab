//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Voucher validation and double-entry balance rules
//! - `registry` - Detail and subsidiary ledger rules

pub mod ledger;
pub mod registry;
