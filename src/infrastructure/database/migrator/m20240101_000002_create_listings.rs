//! Create listings table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::Description).text().not_null())
                    .col(
                        ColumnDef::new(Listings::ImageUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Listings::ImageFilename)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Listings::Price).double())
                    .col(ColumnDef::new(Listings::Location).string().not_null())
                    .col(ColumnDef::new(Listings::Country).string().not_null())
                    .col(
                        ColumnDef::new(Listings::Tags)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Listings::Longitude).double().not_null())
                    .col(ColumnDef::new(Listings::Latitude).double().not_null())
                    .col(ColumnDef::new(Listings::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Listings::ReviewIds)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_owner")
                            .from(Listings::Table, Listings::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_owner")
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Listings {
    Table,
    Id,
    Title,
    Description,
    ImageUrl,
    ImageFilename,
    Price,
    Location,
    Country,
    Tags,
    Longitude,
    Latitude,
    OwnerId,
    ReviewIds,
    CreatedAt,
}
