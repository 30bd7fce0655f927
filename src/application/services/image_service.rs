use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;

use crate::application::ports::{
    AiClient, ArtifactStore, ImageEditRequest, ImageGenerationRequest,
};
use crate::domain::{
    ArtifactCategory, ImageBatchRecord, ImageRecord, ImageStyle, MAX_IMAGES_PER_REQUEST,
    timestamped_stem,
};

use super::source_file::{file_name_of, read_source_file, require_text};
use super::{RetryPolicy, ServiceError};

/// Only this model accepts the `style` parameter.
pub const STYLE_CAPABLE_MODEL: &str = "dall-e-3";

#[derive(Debug, Clone, PartialEq)]
pub struct ImageDefaults {
    pub model: String,
    pub size: String,
}

pub struct ImageService {
    client: Arc<dyn AiClient>,
    store: Arc<dyn ArtifactStore>,
    retry: RetryPolicy,
    defaults: ImageDefaults,
}

impl ImageService {
    pub fn new(
        client: Arc<dyn AiClient>,
        store: Arc<dyn ArtifactStore>,
        retry: RetryPolicy,
        defaults: ImageDefaults,
    ) -> Self {
        Self {
            client,
            store,
            retry,
            defaults,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn default_size(&self) -> &str {
        &self.defaults.size
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        size: Option<&str>,
        style: Option<ImageStyle>,
    ) -> Result<ImageRecord, ServiceError> {
        let batch = self.generate_images(prompt, size, style, 1).await?;
        let path = batch
            .paths
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("no image returned".to_string()))?;
        Ok(ImageRecord {
            path,
            prompt: batch.prompt,
            size: batch.size,
        })
    }

    /// Generates `count` images and writes one PNG per image under `dalle/`.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn generate_images(
        &self,
        prompt: &str,
        size: Option<&str>,
        style: Option<ImageStyle>,
        count: u8,
    ) -> Result<ImageBatchRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }
        let prompt = require_text(prompt, "image prompt")?;
        if count == 0 || count > MAX_IMAGES_PER_REQUEST {
            return Err(ServiceError::InvalidInput(format!(
                "image count must be between 1 and {}",
                MAX_IMAGES_PER_REQUEST
            )));
        }
        let size = self.resolve_size(size);
        let style = self.supported_style(style);

        let request = ImageGenerationRequest {
            model: self.defaults.model.clone(),
            prompt: prompt.to_string(),
            size: size.clone(),
            style,
            count,
        };

        let client = &self.client;
        let request = &request;
        let payloads = self
            .retry
            .execute("image generation", move || client.generate_images(request))
            .await?;

        let images = decode_payloads(&payloads, usize::from(count))?;
        let paths = self.persist_images(&images).await?;

        tracing::info!(images = paths.len(), size = %size, "Images saved");

        Ok(ImageBatchRecord {
            paths,
            prompt: prompt.to_string(),
            size,
        })
    }

    /// Edits an existing image, optionally restricted to the transparent area
    /// of `mask_path`. Both files must exist before anything is sent.
    #[tracing::instrument(skip(self, prompt))]
    pub async fn edit_image(
        &self,
        image_path: &Path,
        prompt: &str,
        mask_path: Option<&Path>,
        size: Option<&str>,
    ) -> Result<ImageRecord, ServiceError> {
        if !self.is_configured() {
            return Err(ServiceError::unconfigured());
        }
        let prompt = require_text(prompt, "image prompt")?;

        let image = read_source_file(image_path).await?;
        let mask = match mask_path {
            Some(path) => Some(read_source_file(path).await?),
            None => None,
        };
        let size = self.resolve_size(size);

        let request = ImageEditRequest {
            model: self.defaults.model.clone(),
            prompt: prompt.to_string(),
            size: size.clone(),
            image,
            image_name: file_name_of(image_path, "image.png"),
            mask,
        };

        let client = &self.client;
        let request = &request;
        let payloads = self
            .retry
            .execute("image edit", move || client.edit_image(request))
            .await?;

        let images = decode_payloads(&payloads, 1)?;
        let path = self
            .persist_images(&images)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::InvalidResponse("no image returned".to_string()))?;

        tracing::info!(path = %path.display(), "Edited image saved");

        Ok(ImageRecord {
            path,
            prompt: prompt.to_string(),
            size,
        })
    }

    fn supported_style(&self, style: Option<ImageStyle>) -> Option<ImageStyle> {
        let style = style?;
        if self.defaults.model == STYLE_CAPABLE_MODEL {
            return Some(style);
        }
        tracing::warn!(
            model = %self.defaults.model,
            style = %style,
            "Image style is only supported by {}, ignoring it",
            STYLE_CAPABLE_MODEL
        );
        None
    }

    fn resolve_size(&self, size: Option<&str>) -> String {
        size.map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.defaults.size)
            .to_string()
    }

    async fn persist_images(&self, images: &[Vec<u8>]) -> Result<Vec<PathBuf>, ServiceError> {
        let base = timestamped_stem("image", Utc::now());
        let mut paths = Vec::with_capacity(images.len());
        for (index, bytes) in images.iter().enumerate() {
            let stem = if images.len() == 1 {
                base.clone()
            } else {
                format!("{}-{}", base, index + 1)
            };
            match self
                .store
                .persist(ArtifactCategory::Images, &stem, "png", bytes)
                .await
            {
                Ok(path) => paths.push(path),
                Err(e) => {
                    remove_written(&paths).await;
                    return Err(e.into());
                }
            }
        }
        Ok(paths)
    }
}

/// Removes the files of a batch that failed part way through.
async fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial image");
        }
    }
}

/// Decodes every payload before anything is written, so a bad payload leaves
/// no files behind.
fn decode_payloads(payloads: &[String], expected: usize) -> Result<Vec<Vec<u8>>, ServiceError> {
    if payloads.is_empty() {
        return Err(ServiceError::InvalidResponse(
            "no image data in response".to_string(),
        ));
    }
    if payloads.len() != expected {
        tracing::warn!(
            expected,
            received = payloads.len(),
            "Image count differs from request"
        );
    }

    payloads
        .iter()
        .map(|payload| {
            STANDARD
                .decode(payload.trim())
                .map_err(|e| ServiceError::InvalidResponse(format!("base64 image: {}", e)))
        })
        .collect()
}
