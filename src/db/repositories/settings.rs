use std::collections::BTreeMap;

use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};

use crate::entities::{prelude::*, settings};

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn all(&self) -> Result<BTreeMap<String, String>> {
        let rows = Settings::find().all(&self.conn).await?;
        Ok(rows.into_iter().map(|m| (m.key, m.value)).collect())
    }

    /// Upsert every provided key; untouched keys keep their values.
    pub async fn upsert(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let now = chrono::Utc::now().to_rfc3339();
        let models = values.iter().map(|(key, value)| settings::ActiveModel {
            key: Set(key.clone()),
            value: Set(value.clone()),
            updated_at: Set(now.clone()),
        });

        Settings::insert_many(models)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
