//! SeaORM implementation of ReviewRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::review::{Review, ReviewRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::review;

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: review::Model) -> Review {
    Review {
        id: m.id,
        listing_id: m.listing_id,
        author_id: m.author_id,
        rating: m.rating,
        comment: m.comment,
        created_at: m.created_at,
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn save(&self, r: Review) -> DomainResult<()> {
        let model = review::ActiveModel {
            id: Set(r.id),
            listing_id: Set(r.listing_id),
            author_id: Set(r.author_id),
            rating: Set(r.rating),
            comment: Set(r.comment),
            created_at: Set(r.created_at),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>> {
        let model = review::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Review>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut by_id: HashMap<String, Review> = review::Entity::find()
            .filter(review::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), model_to_domain(m)))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        review::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = review::Entity::delete_many()
            .filter(review::Column::Id.is_in(ids.iter().cloned()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
