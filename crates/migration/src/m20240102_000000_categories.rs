//! Category records.
//!
//! Optional per-category budgets, in minor units like expense amounts. The
//! name is the normalized category label and is unique.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    BudgetLimitMinor,
    MonthlyBudgetMinor,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Categories::BudgetLimitMinor).big_integer().null())
                    .col(ColumnDef::new(Categories::MonthlyBudgetMinor).big_integer().null())
                    .check(
                        Expr::col(Categories::BudgetLimitMinor)
                            .is_null()
                            .or(Expr::col(Categories::BudgetLimitMinor).gte(0)),
                    )
                    .check(
                        Expr::col(Categories::MonthlyBudgetMinor)
                            .is_null()
                            .or(Expr::col(Categories::MonthlyBudgetMinor).gte(0)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}
