//! Registry service for DL/SL validation.

use crate::ledger::LedgerError;
use crate::ledger::validation::{
    validate_code_and_title, validate_uniqueness, validate_unreferenced, validate_version,
};

use super::types::RegistryEntry;

/// Registry service for business logic.
///
/// The same rules apply to detail and subsidiary ledgers. Callers read the
/// stored state first and hand it in.
pub struct RegistryService;

impl RegistryService {
    /// Validate a new record.
    ///
    /// `conflicts` holds `(code, title)` of existing records sharing either value.
    ///
    /// # Errors
    ///
    /// Returns a length error, then `CodeAlreadyExists` / `TitleAlreadyExists`.
    pub fn validate_create<'a>(
        code: &str,
        title: &str,
        conflicts: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), LedgerError> {
        validate_code_and_title(code, title)?;
        validate_uniqueness(conflicts, code, title)
    }

    /// Validate an update.
    ///
    /// Order: lengths, existence, version, uniqueness, reference guard.
    /// `stored_version` is `None` when the record does not exist and
    /// `conflicts` must already exclude the record itself. Pass a
    /// `reference_count` of 0 for records that may change while referenced.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_update<'a>(
        entry: RegistryEntry,
        code: &str,
        title: &str,
        expected_version: i64,
        stored_version: Option<i64>,
        conflicts: impl IntoIterator<Item = (&'a str, &'a str)>,
        reference_count: u64,
    ) -> Result<(), LedgerError> {
        validate_code_and_title(code, title)?;
        let stored = stored_version.ok_or(entry.not_found())?;
        validate_version(expected_version, stored)?;
        validate_uniqueness(conflicts, code, title)?;
        validate_unreferenced(reference_count)
    }

    /// Validate a hard delete.
    ///
    /// Order: existence, version, reference guard.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_delete(
        entry: RegistryEntry,
        expected_version: i64,
        stored_version: Option<i64>,
        reference_count: u64,
    ) -> Result<(), LedgerError> {
        let stored = stored_version.ok_or(entry.not_found())?;
        validate_version(expected_version, stored)?;
        validate_unreferenced(reference_count)
    }
}
