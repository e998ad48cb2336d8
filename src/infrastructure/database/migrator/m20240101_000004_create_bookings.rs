//! Create bookings table
//!
//! Bookings keep a plain `listing_id` column without a foreign key: a booking
//! whose listing has vanished is detected and removed on read.
//! A partial unique index allows at most one pending booking per
//! (listing, user) pair.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::ListingId).string().not_null())
                    .col(ColumnDef::new(Bookings::UserId).string().not_null())
                    .col(ColumnDef::new(Bookings::OwnerId).string().not_null())
                    .col(ColumnDef::new(Bookings::FullName).string().not_null())
                    .col(ColumnDef::new(Bookings::MobileNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::PickupDate).date().not_null())
                    .col(ColumnDef::new(Bookings::ReturnDate).date().not_null())
                    .col(ColumnDef::new(Bookings::PickupTime).string().not_null())
                    .col(ColumnDef::new(Bookings::ReturnTime).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_listing_user")
                    .table(Bookings::Table)
                    .col(Bookings::ListingId)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_owner")
                    .table(Bookings::Table)
                    .col(Bookings::OwnerId)
                    .to_owned(),
            )
            .await?;

        // sea-query has no portable builder for partial indexes
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_bookings_one_pending \
                 ON bookings (listing_id, user_id) WHERE status = 'pending'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    ListingId,
    UserId,
    OwnerId,
    FullName,
    MobileNumber,
    PickupDate,
    ReturnDate,
    PickupTime,
    ReturnTime,
    Status,
    CreatedAt,
}
