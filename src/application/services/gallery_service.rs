use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{ArtifactEntry, ArtifactStore};
use crate::domain::ArtifactCategory;

use super::ServiceError;

pub const DEFAULT_RECENT_LIMIT: usize = 9;

#[derive(Debug, Clone, Serialize)]
pub struct GallerySection {
    pub category: ArtifactCategory,
    pub label: &'static str,
    pub count: usize,
    pub recent: Vec<ArtifactEntry>,
}

/// Discovers persisted artifacts by listing the data directories.
pub struct GalleryService {
    store: Arc<dyn ArtifactStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub async fn section(
        &self,
        category: ArtifactCategory,
        limit: usize,
    ) -> Result<GallerySection, ServiceError> {
        let mut entries = self.store.list(category).await?;
        let count = entries.len();
        entries.truncate(limit);
        Ok(GallerySection {
            category,
            label: category.label(),
            count,
            recent: entries,
        })
    }

    pub async fn sections(&self, limit: usize) -> Result<Vec<GallerySection>, ServiceError> {
        let mut sections = Vec::with_capacity(ArtifactCategory::ALL.len());
        for category in ArtifactCategory::ALL {
            sections.push(self.section(category, limit).await?);
        }
        Ok(sections)
    }
}
