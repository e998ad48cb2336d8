//! Listing entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub image_url: String,
    pub image_filename: String,

    /// Daily rate; NULL on rows created before the rate was mandatory
    #[sea_orm(nullable)]
    pub price: Option<f64>,

    pub location: String,
    pub country: String,

    /// JSON array of tag names
    #[sea_orm(column_type = "Text")]
    pub tags: String,

    pub longitude: f64,
    pub latitude: f64,

    pub owner_id: String,

    /// JSON array of review ids, oldest first
    #[sea_orm(column_type = "Text")]
    pub review_ids: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
