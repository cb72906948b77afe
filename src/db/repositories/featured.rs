use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{featured_items, prelude::*};
use crate::models::catalog::CatalogKind;

/// A carousel slot referencing a movie or series by id.
#[derive(Debug, Clone)]
pub struct FeaturedEntry {
    pub id: i32,
    pub kind: CatalogKind,
    pub item_id: String,
    pub position: i32,
}

fn map_model(model: featured_items::Model) -> Option<FeaturedEntry> {
    Some(FeaturedEntry {
        id: model.id,
        kind: CatalogKind::parse(&model.kind)?,
        item_id: model.item_id,
        position: model.position,
    })
}

pub struct FeaturedRepository {
    conn: DatabaseConnection,
}

impl FeaturedRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All slots in carousel order. Rows with an unknown kind are skipped.
    pub async fn list(&self) -> Result<Vec<FeaturedEntry>> {
        let rows = FeaturedItems::find()
            .order_by_asc(featured_items::Column::Position)
            .order_by_asc(featured_items::Column::Id)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().filter_map(map_model).collect())
    }

    /// Append an item at the end of the carousel.
    pub async fn add(&self, kind: CatalogKind, item_id: &str) -> Result<FeaturedEntry> {
        let last = FeaturedItems::find()
            .order_by_desc(featured_items::Column::Position)
            .one(&self.conn)
            .await?;
        let position = last.map_or(0, |m| m.position + 1);

        let active = featured_items::ActiveModel {
            kind: Set(kind.as_str().to_string()),
            item_id: Set(item_id.to_string()),
            position: Set(position),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };
        let model = active.insert(&self.conn).await?;
        info!("Featured {} {} at position {}", kind, item_id, position);

        map_model(model).ok_or_else(|| anyhow::anyhow!("Featured row has invalid kind"))
    }

    /// Rewrite carousel positions to match the given slot-id order.
    pub async fn reorder(&self, ordered_ids: &[i32]) -> Result<()> {
        for (position, slot_id) in ordered_ids.iter().enumerate() {
            FeaturedItems::update_many()
                .col_expr(
                    featured_items::Column::Position,
                    sea_orm::sea_query::Expr::value(i32::try_from(position).unwrap_or(i32::MAX)),
                )
                .filter(featured_items::Column::Id.eq(*slot_id))
                .exec(&self.conn)
                .await?;
        }
        Ok(())
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = FeaturedItems::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
