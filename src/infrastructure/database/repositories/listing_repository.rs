//! SeaORM implementation of ListingRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::listing::{
    GeoPoint, Listing, ListingFilter, ListingImage, ListingRepository, ListingTag,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::listing;

pub struct SeaOrmListingRepository {
    db: DatabaseConnection,
}

impl SeaOrmListingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn tags_to_json(tags: &[ListingTag]) -> String {
    let names: Vec<&str> = tags.iter().map(ListingTag::as_str).collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}

fn tags_from_json(raw: &str) -> Vec<ListingTag> {
    serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_default()
        .iter()
        .filter_map(|name| ListingTag::parse(name))
        .collect()
}

fn ids_to_json(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

fn ids_from_json(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

pub(super) fn model_to_domain(m: listing::Model) -> Listing {
    Listing {
        id: m.id,
        title: m.title,
        description: m.description,
        image: ListingImage {
            url: m.image_url,
            filename: m.image_filename,
        },
        price: m.price,
        location: m.location,
        country: m.country,
        tags: tags_from_json(&m.tags),
        geometry: GeoPoint {
            longitude: m.longitude,
            latitude: m.latitude,
        },
        owner_id: m.owner_id,
        reviews: ids_from_json(&m.review_ids),
        created_at: m.created_at,
    }
}

fn domain_to_active(l: Listing) -> listing::ActiveModel {
    listing::ActiveModel {
        tags: Set(tags_to_json(&l.tags)),
        review_ids: Set(ids_to_json(&l.reviews)),
        id: Set(l.id),
        title: Set(l.title),
        description: Set(l.description),
        image_url: Set(l.image.url),
        image_filename: Set(l.image.filename),
        price: Set(l.price),
        location: Set(l.location),
        country: Set(l.country),
        longitude: Set(l.geometry.longitude),
        latitude: Set(l.geometry.latitude),
        owner_id: Set(l.owner_id),
        created_at: Set(l.created_at),
    }
}

// ── ListingRepository impl ──────────────────────────────────────

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn save(&self, l: Listing) -> DomainResult<()> {
        debug!(listing_id = %l.id, owner_id = %l.owner_id, "Saving listing");
        domain_to_active(l).insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Listing>> {
        let model = listing::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn search(&self, filter: &ListingFilter) -> DomainResult<Vec<Listing>> {
        let listings = listing::Entity::find()
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_domain);

        // SQL LIKE case folding is backend-specific and tags live in a JSON
        // column, so filtering happens here.
        if !filter.is_filtered() {
            return Ok(listings.collect());
        }
        Ok(listings.filter(|l| filter.matches(l)).collect())
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Listing>> {
        let models = listing::Entity::find()
            .filter(listing::Column::OwnerId.eq(owner_id))
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, l: Listing) -> DomainResult<()> {
        let id = l.id.clone();
        debug!(listing_id = %id, "Updating listing");
        let exists = listing::Entity::find_by_id(id.as_str())
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Err(DomainError::NotFound(format!("Listing {id} not found")));
        }
        domain_to_active(l).update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = listing::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::domain::booking::model::tests::sample_listing;
    use crate::domain::listing::{ListingFilter, ListingTag};
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::repositories::booking_repository::tests::sqlite_repos;

    #[tokio::test]
    async fn search_folds_case_beyond_ascii() {
        let repos = sqlite_repos().await;
        let mut coupe = sample_listing("owner");
        coupe.id = "listing-2".into();
        coupe.title = "ÉCLAT Coupé".into();
        coupe.location = "Lyon".into();
        coupe.country = "France".into();
        coupe.tags = vec![ListingTag::Premium, ListingTag::Manual];
        repos.listings().save(coupe).await.unwrap();

        let all = repos.listings().search(&ListingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_term = ListingFilter {
            search: Some("éclat".into()),
            tags: vec![],
        };
        let found = repos.listings().search(&by_term).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "listing-2");

        let by_country = ListingFilter {
            search: Some("INDIA".into()),
            tags: vec![],
        };
        let found = repos.listings().search(&by_country).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "listing-1");

        let by_tags = ListingFilter {
            search: None,
            tags: vec![ListingTag::Premium, ListingTag::Manual],
        };
        let found = repos.listings().search(&by_tags).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "listing-2");
    }
}
