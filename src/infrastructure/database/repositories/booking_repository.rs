//! SeaORM implementation of BookingRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, warn};

use super::listing_repository;
use super::user_repository::is_unique_violation;
use crate::domain::booking::{Booking, BookingRepository, BookingStatus, BookingWithListing};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, listing};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_from_db(booking_id: &str, raw: &str) -> BookingStatus {
    BookingStatus::parse(raw).unwrap_or_else(|| {
        warn!(booking_id, status = raw, "Unknown booking status in database, treating as pending");
        BookingStatus::Pending
    })
}

fn model_to_domain(m: booking::Model) -> Booking {
    Booking {
        status: status_from_db(&m.id, &m.status),
        id: m.id,
        listing_id: m.listing_id,
        user_id: m.user_id,
        owner_id: m.owner_id,
        full_name: m.full_name,
        mobile_number: m.mobile_number,
        pickup_date: m.pickup_date,
        return_date: m.return_date,
        pickup_time: m.pickup_time,
        return_time: m.return_time,
        created_at: m.created_at,
    }
}

fn joined_to_domain((b, l): (booking::Model, Option<listing::Model>)) -> BookingWithListing {
    BookingWithListing {
        booking: model_to_domain(b),
        listing: l.map(listing_repository::model_to_domain),
    }
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn save(&self, b: Booking) -> DomainResult<()> {
        debug!(booking_id = %b.id, listing_id = %b.listing_id, user_id = %b.user_id, "Saving booking");
        let model = booking::ActiveModel {
            id: Set(b.id),
            listing_id: Set(b.listing_id),
            user_id: Set(b.user_id),
            owner_id: Set(b.owner_id),
            full_name: Set(b.full_name),
            mobile_number: Set(b.mobile_number),
            pickup_date: Set(b.pickup_date),
            return_date: Set(b.return_date),
            pickup_time: Set(b.pickup_time),
            return_time: Set(b.return_time),
            status: Set(b.status.as_str().to_string()),
            created_at: Set(b.created_at),
        };

        model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("pending booking for this listing".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        let existing = booking::Entity::find_by_id(id).one(&self.db).await?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound(format!("Booking {id} not found")));
        };

        let mut active: booking::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn find_for_listing_and_user(
        &self,
        listing_id: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::ListingId.eq(listing_id))
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_owner_with_listing(
        &self,
        owner_id: &str,
    ) -> DomainResult<Vec<BookingWithListing>> {
        let rows = booking::Entity::find()
            .filter(booking::Column::OwnerId.eq(owner_id))
            .order_by_desc(booking::Column::CreatedAt)
            .find_also_related(listing::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(joined_to_domain).collect())
    }

    async fn find_by_user_with_listing(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<BookingWithListing>> {
        let rows = booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .find_also_related(listing::Entity)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(joined_to_domain).collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = booking::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_listing(&self, listing_id: &str) -> DomainResult<u64> {
        let result = booking::Entity::delete_many()
            .filter(booking::Column::ListingId.eq(listing_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = booking::Entity::delete_many()
            .filter(booking::Column::Id.is_in(ids.iter().cloned()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::booking::model::tests::{booking, sample_listing};
    use crate::domain::{RepositoryProvider, User};
    use crate::infrastructure::database::{init_database, run_migrations, DatabaseConfig};
    use crate::infrastructure::SeaOrmRepositoryProvider;

    /// Migrated in-memory SQLite holding user `owner` and listing `listing-1`.
    pub(crate) async fn sqlite_repos() -> SeaOrmRepositoryProvider {
        let db = init_database(&DatabaseConfig::sqlite_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();
        let repos = SeaOrmRepositoryProvider::new(db);

        let mut owner = User::new("owner", "owner@example.com", "hash");
        owner.id = "owner".into();
        repos.users().save(owner).await.unwrap();
        repos.listings().save(sample_listing("owner")).await.unwrap();
        repos
    }

    #[tokio::test]
    async fn second_pending_booking_hits_the_unique_index() {
        let repos = sqlite_repos().await;
        repos
            .bookings()
            .save(booking(BookingStatus::Pending, "2024-01-02", "09:00"))
            .await
            .unwrap();

        let err = repos
            .bookings()
            .save(booking(BookingStatus::Pending, "2024-01-03", "09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // the index only covers pending rows
        repos
            .bookings()
            .save(booking(BookingStatus::Rejected, "2024-01-03", "09:00"))
            .await
            .unwrap();
        repos
            .bookings()
            .save(booking(BookingStatus::Approved, "2024-01-04", "09:00"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn decided_booking_frees_the_pending_slot() {
        let repos = sqlite_repos().await;
        let first = booking(BookingStatus::Pending, "2024-01-02", "09:00");
        repos.bookings().save(first.clone()).await.unwrap();
        repos
            .bookings()
            .update_status(&first.id, BookingStatus::Rejected)
            .await
            .unwrap();

        repos
            .bookings()
            .save(booking(BookingStatus::Pending, "2024-01-03", "09:00"))
            .await
            .unwrap();

        let history = repos
            .bookings()
            .find_for_listing_and_user("listing-1", "renter")
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        let stored = history.iter().find(|b| b.id == first.id).unwrap();
        assert_eq!(stored.status, BookingStatus::Rejected);
    }

    #[tokio::test]
    async fn join_leaves_listing_empty_for_orphans() {
        let repos = sqlite_repos().await;
        let kept = booking(BookingStatus::Approved, "2024-01-02", "09:00");
        let mut orphan = booking(BookingStatus::Approved, "2024-01-02", "09:00");
        orphan.listing_id = "gone".into();
        repos.bookings().save(kept.clone()).await.unwrap();
        repos.bookings().save(orphan.clone()).await.unwrap();

        let rows = repos.bookings().find_by_owner_with_listing("owner").await.unwrap();
        assert_eq!(rows.len(), 2);
        let kept_row = rows.iter().find(|r| r.booking.id == kept.id).unwrap();
        let orphan_row = rows.iter().find(|r| r.booking.id == orphan.id).unwrap();
        assert_eq!(kept_row.listing.as_ref().unwrap().price, Some(1000.0));
        assert!(orphan_row.listing.is_none());

        let mine = repos.bookings().find_by_user_with_listing("renter").await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn bulk_deletes_report_removed_rows() {
        let repos = sqlite_repos().await;
        let a = booking(BookingStatus::Approved, "2024-01-02", "09:00");
        let b = booking(BookingStatus::Rejected, "2024-01-02", "09:00");
        let mut elsewhere = booking(BookingStatus::Approved, "2024-01-02", "09:00");
        elsewhere.listing_id = "other".into();
        for bk in [a.clone(), b.clone(), elsewhere.clone()] {
            repos.bookings().save(bk).await.unwrap();
        }

        assert_eq!(repos.bookings().delete_by_listing("listing-1").await.unwrap(), 2);
        assert_eq!(repos.bookings().delete_many(&[]).await.unwrap(), 0);
        assert_eq!(
            repos
                .bookings()
                .delete_many(&[elsewhere.id.clone(), "missing".into()])
                .await
                .unwrap(),
            1
        );
        assert!(repos.bookings().find_by_id(&a.id).await.unwrap().is_none());
        assert!(!repos.bookings().delete(&b.id).await.unwrap());
    }
}
