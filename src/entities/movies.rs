use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    /// UUID v4, generated at insert.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub original_title: Option<String>,
    #[sea_orm(unique)]
    pub slug: Option<String>,
    /// JSON array of genre labels.
    pub genres: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    /// JSON array of `{name, url, quality?, language?}` entries.
    pub stream_servers: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
