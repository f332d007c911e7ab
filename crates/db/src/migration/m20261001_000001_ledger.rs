//! Initial ledger schema: DL/SL registries, vouchers and voucher lines.
//!
//! Built with the schema builder so it runs on PostgreSQL and SQLite alike.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DetailLedgers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DetailLedgers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DetailLedgers::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DetailLedgers::Title)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DetailLedgers::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(DetailLedgers::CreatedAt))
                    .col(timestamp(DetailLedgers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubsidiaryLedgers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubsidiaryLedgers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubsidiaryLedgers::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SubsidiaryLedgers::Title)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SubsidiaryLedgers::RequiresDetail)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubsidiaryLedgers::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(SubsidiaryLedgers::CreatedAt))
                    .col(timestamp(SubsidiaryLedgers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vouchers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::Number)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(Vouchers::CreatedAt))
                    .col(timestamp(Vouchers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoucherLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoucherLines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VoucherLines::VoucherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VoucherLines::SlId).big_integer().not_null())
                    .col(ColumnDef::new(VoucherLines::DlId).big_integer().null())
                    .col(
                        ColumnDef::new(VoucherLines::Debit)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(VoucherLines::Debit).gte(0)),
                    )
                    .col(
                        ColumnDef::new(VoucherLines::Credit)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(VoucherLines::Credit).gte(0)),
                    )
                    .col(
                        ColumnDef::new(VoucherLines::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(VoucherLines::CreatedAt))
                    .col(timestamp(VoucherLines::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_lines_voucher")
                            .from(VoucherLines::Table, VoucherLines::VoucherId)
                            .to(Vouchers::Table, Vouchers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_lines_sl")
                            .from(VoucherLines::Table, VoucherLines::SlId)
                            .to(SubsidiaryLedgers::Table, SubsidiaryLedgers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_lines_dl")
                            .from(VoucherLines::Table, VoucherLines::DlId)
                            .to(DetailLedgers::Table, DetailLedgers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Lines are always read per voucher
        manager
            .create_index(
                Index::create()
                    .name("idx_voucher_lines_voucher")
                    .table(VoucherLines::Table)
                    .col(VoucherLines::VoucherId)
                    .to_owned(),
            )
            .await?;

        // Reference guards count lines per SL / DL
        manager
            .create_index(
                Index::create()
                    .name("idx_voucher_lines_sl")
                    .table(VoucherLines::Table)
                    .col(VoucherLines::SlId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_voucher_lines_dl")
                    .table(VoucherLines::Table)
                    .col(VoucherLines::DlId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoucherLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vouchers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubsidiaryLedgers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DetailLedgers::Table).to_owned())
            .await
    }
}

fn timestamp(column: impl IntoIden) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum DetailLedgers {
    Table,
    Id,
    Code,
    Title,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubsidiaryLedgers {
    Table,
    Id,
    Code,
    Title,
    RequiresDetail,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Vouchers {
    Table,
    Id,
    Number,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VoucherLines {
    Table,
    Id,
    VoucherId,
    SlId,
    DlId,
    Debit,
    Credit,
    Version,
    CreatedAt,
    UpdatedAt,
}
