use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250701_090000_init::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

const MANAGER_ID: u128 = 12345;

const EMPLOYEES: [&str; 6] = ["jane.doe", "john.smith", "marie.tremblay", "liam.wilson", "ava.martin", "noah.garcia"];

fn seed_id(i: u128) -> SimpleExpr {
    Expr::val(format!("{i:032x}")).cast_as("uuid")
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-07-01T09:30:00.000Z").cast_as("timestamptz");

        let users = EMPLOYEES
            .iter()
            .enumerate()
            .map(|(i, username)| (seed_id(i as u128 + 1), *username, "employee"))
            .chain([(seed_id(MANAGER_ID), "manager", "manager")]);

        // Every seeded user logs in with their username as password
        for (id, username, role) in users {
            let hashed_password = &sha2::Sha256::digest(format!("{username}:{username}"))[..];

            manager
                .exec_stmt(Query::insert()
                    .into_table(User::Table)
                    .columns(["id", "created_at", "updated_at", "username", "password", "role"])
                    .values_panic([id, time.clone(), time.clone(), username.into(), hashed_password.into(), Expr::val(role).cast_as("role_type")])
                    .to_owned()
            ).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids = (1..=EMPLOYEES.len() as u128).chain([MANAGER_ID]);

        for id in ids {
            manager
                .exec_stmt(Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col("id").eq(seed_id(id)))
                    .to_owned()
            ).await?;
        }

        Ok(())
    }
}
