//! Create `user` table for the account service.
//!
//! `username` and `email` carry unique keys; the password column holds a PHC hash string.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Username, 64).unique_key().not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string_len(User::Password, 255).not_null())
                    .col(ColumnDef::new(User::Picture).binary().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Username, Email, Password, Picture }
