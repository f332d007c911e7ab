//! `SeaORM` Entity for detail_ledgers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "detail_ledgers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(unique)]
    pub title: String,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::voucher_lines::Entity")]
    VoucherLines,
}

impl Related<super::voucher_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoucherLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
