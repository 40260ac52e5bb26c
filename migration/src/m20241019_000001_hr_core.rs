use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    EmployeeId,
    FirstName,
    LastName,
    Position,
    Department,
}

#[derive(DeriveIden)]
enum DirectReports {
    Table,
    ManagerId,
    Ordinal,
    ReportId,
}

#[derive(DeriveIden)]
enum Compensations {
    Table,
    EmployeeId,
    Salary,
    EffectiveDate,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::EmployeeId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).string().not_null())
                    .col(ColumnDef::new(Employees::LastName).string().not_null())
                    .col(ColumnDef::new(Employees::Position).string().not_null())
                    .col(ColumnDef::new(Employees::Department).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DirectReports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DirectReports::ManagerId).string().not_null())
                    .col(ColumnDef::new(DirectReports::Ordinal).integer().not_null())
                    .col(ColumnDef::new(DirectReports::ReportId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(DirectReports::ManagerId)
                            .col(DirectReports::Ordinal),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_direct_reports_manager")
                            .from(DirectReports::Table, DirectReports::ManagerId)
                            .to(Employees::Table, Employees::EmployeeId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_direct_reports_report_id")
                    .table(DirectReports::Table)
                    .col(DirectReports::ReportId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Compensations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensations::EmployeeId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Compensations::Salary).double().not_null())
                    .col(ColumnDef::new(Compensations::EffectiveDate).date().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DirectReports::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await
    }
}
