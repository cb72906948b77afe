//! Catalog domain logic: identity resolution, relation discovery and
//! stream-server selection.

pub mod player;
pub mod related;
pub mod resolver;

use thiserror::Error;

use crate::models::catalog::CatalogKind;

/// Domain errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} '{input}' not found")]
    NotFound { kind: CatalogKind, input: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Import error: {service} - {message}")]
    Import { service: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn not_found(kind: CatalogKind, input: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            input: input.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn import(service: &str, msg: impl Into<String>) -> Self {
        Self::Import {
            service: service.to_string(),
            message: msg.into(),
        }
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}
