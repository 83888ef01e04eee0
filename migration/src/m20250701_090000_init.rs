use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, DefaultColumn}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<RoleType>()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // sha256 of `password:username`
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(FinalizedPayroll::Table)
                .col(ColumnDef::new(FinalizedPayroll::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(FinalizedPayroll::EmployeeName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(FinalizedPayroll::Region)
                    .text()
                    .not_null())
                .col(ColumnDef::new(FinalizedPayroll::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(FinalizedPayroll::EndDate)
                    .date()
                    .not_null())
                .col(money(FinalizedPayroll::HoursWorked))
                .col(money(FinalizedPayroll::GrossPay))
                .col(money(FinalizedPayroll::VacationPay))
                .col(money(FinalizedPayroll::TaxAmount))
                .col(money(FinalizedPayroll::TotalDeductions))
                .col(money(FinalizedPayroll::NetPay))
                .col(ColumnDef::new(FinalizedPayroll::Draft)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(FinalizedPayroll::Computed)
                    .json_binary()
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, FinalizedPayroll::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(FinalizedPayroll::Table, FinalizedPayroll::EmployeeId)
            .to(User::Table, DefaultColumn::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .on_update(ForeignKeyAction::Cascade)
            .take()
        ).await?;

        // Year to date totals and exports both look payrolls up by employee and period
        manager.create_index(IndexCreateStatement::new()
            .name("idx_finalized_payroll_employee_period")
            .table(FinalizedPayroll::Table)
            .col(FinalizedPayroll::EmployeeId)
            .col(FinalizedPayroll::EndDate)
            .take()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                TableDropStatement::new()
                    .table(FinalizedPayroll::Table)
                    .take()
            ).await?;

        manager
            .drop_table(
                TableDropStatement::new()
                    .table(User::Table)
                    .take()
            ).await?;

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RoleType::name())
                    .to_owned()
            ).await?;

        Ok(())
    }
}

fn money(column: FinalizedPayroll) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(12, 2)
        .not_null()
        .default(0)
        .take()
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    Username,
    Password,
    Role,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "manager")]
    Manager,
}

#[derive(Iden)]
enum FinalizedPayroll {
    Table,
    EmployeeId,
    EmployeeName,
    Region,
    StartDate,
    EndDate,
    HoursWorked,
    GrossPay,
    VacationPay,
    TaxAmount,
    TotalDeductions,
    NetPay,
    Draft,
    Computed,
}
