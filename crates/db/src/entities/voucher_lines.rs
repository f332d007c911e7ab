//! `SeaORM` Entity for voucher_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub voucher_id: i64,
    pub sl_id: i64,
    pub dl_id: Option<i64>,
    pub debit: i64,
    pub credit: i64,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vouchers::Entity",
        from = "Column::VoucherId",
        to = "super::vouchers::Column::Id",
        on_delete = "Cascade"
    )]
    Vouchers,
    #[sea_orm(
        belongs_to = "super::subsidiary_ledgers::Entity",
        from = "Column::SlId",
        to = "super::subsidiary_ledgers::Column::Id",
        on_delete = "Restrict"
    )]
    SubsidiaryLedgers,
    #[sea_orm(
        belongs_to = "super::detail_ledgers::Entity",
        from = "Column::DlId",
        to = "super::detail_ledgers::Column::Id",
        on_delete = "Restrict"
    )]
    DetailLedgers,
}

impl Related<super::vouchers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vouchers.def()
    }
}

impl Related<super::subsidiary_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubsidiaryLedgers.def()
    }
}

impl Related<super::detail_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DetailLedgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
