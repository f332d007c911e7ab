//! Lookups shared by the DL and SL registries.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tally_core::ledger::LedgerError;

use super::support::unexpected;
use crate::entities::{detail_ledgers, subsidiary_ledgers, voucher_lines};

/// A registry table: unique code and title, referenced from voucher lines.
pub(crate) trait RegistryTable: EntityTrait {
    const ID: Self::Column;
    const CODE: Self::Column;
    const TITLE: Self::Column;
    /// Voucher line column pointing at this table.
    const REFERENCED_BY: voucher_lines::Column;
}

impl RegistryTable for detail_ledgers::Entity {
    const ID: Self::Column = detail_ledgers::Column::Id;
    const CODE: Self::Column = detail_ledgers::Column::Code;
    const TITLE: Self::Column = detail_ledgers::Column::Title;
    const REFERENCED_BY: voucher_lines::Column = voucher_lines::Column::DlId;
}

impl RegistryTable for subsidiary_ledgers::Entity {
    const ID: Self::Column = subsidiary_ledgers::Column::Id;
    const CODE: Self::Column = subsidiary_ledgers::Column::Code;
    const TITLE: Self::Column = subsidiary_ledgers::Column::Title;
    const REFERENCED_BY: voucher_lines::Column = voucher_lines::Column::SlId;
}

/// Records sharing the code or the title, other than `exclude`.
pub(crate) async fn find_conflicts<E, C>(
    conn: &C,
    code: &str,
    title: &str,
    exclude: Option<i64>,
) -> Result<Vec<E::Model>, LedgerError>
where
    E: RegistryTable,
    C: ConnectionTrait,
{
    let mut query = E::find().filter(
        Condition::any()
            .add(E::CODE.eq(code))
            .add(E::TITLE.eq(title)),
    );
    if let Some(id) = exclude {
        query = query.filter(E::ID.ne(id));
    }
    query.all(conn).await.map_err(unexpected)
}

/// Number of voucher lines pointing at the record.
pub(crate) async fn count_references<E, C>(conn: &C, id: i64) -> Result<u64, LedgerError>
where
    E: RegistryTable,
    C: ConnectionTrait,
{
    voucher_lines::Entity::find()
        .filter(E::REFERENCED_BY.eq(id))
        .count(conn)
        .await
        .map_err(unexpected)
}
