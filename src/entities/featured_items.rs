use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "featured_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// "movie" or "series".
    pub kind: String,
    pub item_id: String,
    /// Carousel slot, ascending.
    pub position: i32,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
