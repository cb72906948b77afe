use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "title_views")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// "movie" or "series".
    pub kind: String,
    #[sea_orm(indexed)]
    pub item_id: String,
    pub views: i64,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
