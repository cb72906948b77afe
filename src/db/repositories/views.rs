use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{prelude::*, title_views};
use crate::models::catalog::CatalogKind;

#[derive(Debug, Clone)]
pub struct ViewCount {
    pub kind: CatalogKind,
    pub item_id: String,
    pub views: i64,
}

pub struct ViewsRepository {
    conn: DatabaseConnection,
}

impl ViewsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Bump the counter for one item, creating the row on first view.
    pub async fn record(&self, kind: CatalogKind, item_id: &str) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let existing = TitleViews::find()
            .filter(title_views::Column::Kind.eq(kind.as_str()))
            .filter(title_views::Column::ItemId.eq(item_id))
            .one(&self.conn)
            .await?;

        match existing {
            Some(row) => {
                let views = row.views + 1;
                let mut active: title_views::ActiveModel = row.into();
                active.views = Set(views);
                active.updated_at = Set(now);
                active.update(&self.conn).await?;
                Ok(views)
            }
            None => {
                let active = title_views::ActiveModel {
                    kind: Set(kind.as_str().to_string()),
                    item_id: Set(item_id.to_string()),
                    views: Set(1),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.conn).await?;
                Ok(1)
            }
        }
    }

    pub async fn top(&self, limit: u64) -> Result<Vec<ViewCount>> {
        let rows = TitleViews::find()
            .order_by_desc(title_views::Column::Views)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|m| {
                Some(ViewCount {
                    kind: CatalogKind::parse(&m.kind)?,
                    item_id: m.item_id,
                    views: m.views,
                })
            })
            .collect())
    }

    /// Remove counters for a deleted item.
    pub async fn clear(&self, kind: CatalogKind, item_id: &str) -> Result<()> {
        TitleViews::delete_many()
            .filter(title_views::Column::Kind.eq(kind.as_str()))
            .filter(title_views::Column::ItemId.eq(item_id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
