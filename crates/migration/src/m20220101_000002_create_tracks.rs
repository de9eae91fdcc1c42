//! Create `tracks` table for the media service.
//!
//! `artist` is free text for now; it is expected to reference `user` later.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tracks::Table)
                    .if_not_exists()
                    .col(pk_auto(Tracks::Id))
                    .col(string(Tracks::Name).not_null())
                    .col(string(Tracks::Artist).not_null())
                    .col(ColumnDef::new(Tracks::Data).binary().not_null())
                    .col(ColumnDef::new(Tracks::Cover).binary().null())
                    .col(ColumnDef::new(Tracks::ReleaseDate).date().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tracks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tracks { Table, Id, Name, Artist, Data, Cover, ReleaseDate }
