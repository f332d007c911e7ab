//! DL and SL registry rules.

pub mod service;
pub mod types;


pub use service::RegistryService;
pub use types::{
    CreateDetailLedgerInput, CreateSubsidiaryLedgerInput, RegistryEntry, UpdateDetailLedgerInput,
    UpdateSubsidiaryLedgerInput,
};
