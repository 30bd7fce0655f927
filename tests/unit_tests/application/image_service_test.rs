use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nutrilab::application::ports::{ArtifactEntry, ArtifactStore, ArtifactStoreError};
use nutrilab::application::services::{
    ImageDefaults, ImageService, STYLE_CAPABLE_MODEL, ServiceError,
};
use nutrilab::domain::{ArtifactCategory, ImageStyle};
use nutrilab::infrastructure::ai::MockAiClient;
use nutrilab::infrastructure::storage::LocalArtifactStore;

use crate::support::{Fixture, count_files, fixture, no_retry};

const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

fn defaults(model: &str) -> ImageDefaults {
    ImageDefaults {
        model: model.to_string(),
        size: "512x512".to_string(),
    }
}

fn service(fx: &Fixture) -> ImageService {
    ImageService::new(
        fx.client.clone(),
        fx.store.clone(),
        no_retry(),
        defaults("dall-e-2"),
    )
}

/// Delegates to a local store but fails every write after the first `allowed`.
struct FailingAfterStore {
    inner: Arc<LocalArtifactStore>,
    allowed: usize,
    writes: AtomicUsize,
}

#[async_trait::async_trait]
impl ArtifactStore for FailingAfterStore {
    async fn persist(
        &self,
        category: ArtifactCategory,
        stem: &str,
        extension: &str,
        contents: &[u8],
    ) -> Result<PathBuf, ArtifactStoreError> {
        if self.writes.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(ArtifactStoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.persist(category, stem, extension, contents).await
    }

    async fn list(
        &self,
        category: ArtifactCategory,
    ) -> Result<Vec<ArtifactEntry>, ArtifactStoreError> {
        self.inner.list(category).await
    }

    async fn resolve(
        &self,
        category: ArtifactCategory,
        file_name: &str,
    ) -> Result<PathBuf, ArtifactStoreError> {
        self.inner.resolve(category, file_name).await
    }
}

fn images_dir(fx: &Fixture) -> std::path::PathBuf {
    fx.store.directory(ArtifactCategory::Images)
}

#[tokio::test]
async fn given_prompt_when_generating_image_then_decoded_png_is_saved() {
    let fx = fixture(MockAiClient::new().with_image_payload(PNG_B64));

    let record = service(&fx)
        .generate_image("a bowl of salad", Some("512x512"), None)
        .await
        .unwrap();

    assert_eq!(record.size, "512x512");
    assert_eq!(record.prompt, "a bowl of salad");
    assert_eq!(record.path.extension().unwrap(), "png");
    assert!(record.path.starts_with(images_dir(&fx)));

    let written = std::fs::read(&record.path).unwrap();
    assert_eq!(written, STANDARD.decode(PNG_B64).unwrap());
}

#[tokio::test]
async fn given_no_size_when_generating_image_then_uses_default_size() {
    let fx = fixture(MockAiClient::new());

    let record = service(&fx)
        .generate_image("soup", None, Some(ImageStyle::Natural))
        .await
        .unwrap();

    assert_eq!(record.size, "512x512");
}

#[tokio::test]
async fn given_count_of_three_when_generating_images_then_writes_numbered_files() {
    let fx = fixture(MockAiClient::new());

    let batch = service(&fx)
        .generate_images("fruit", None, Some(ImageStyle::Vivid), 3)
        .await
        .unwrap();

    assert_eq!(batch.paths.len(), 3);
    assert_eq!(count_files(&images_dir(&fx)), 3);
    for (index, path) in batch.paths.iter().enumerate() {
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("image-"));
        assert!(name.ends_with(&format!("-{}.png", index + 1)));
    }
}

#[tokio::test]
async fn given_count_out_of_range_when_generating_images_then_invalid_input() {
    let fx = fixture(MockAiClient::new());
    let service = service(&fx);

    assert!(matches!(
        service.generate_images("fruit", None, None, 0).await,
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        service.generate_images("fruit", None, None, 11).await,
        Err(ServiceError::InvalidInput(_))
    ));
    assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
async fn given_blank_prompt_when_generating_image_then_invalid_input_without_call() {
    let fx = fixture(MockAiClient::new());

    let result = service(&fx).generate_image("   ", None, None).await;

    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
async fn given_invalid_base64_when_generating_image_then_invalid_response_and_no_file() {
    let fx = fixture(MockAiClient::new().with_image_payload("not base64 at all!"));

    let result = service(&fx).generate_image("salad", None, None).await;

    assert!(matches!(result, Err(ServiceError::InvalidResponse(_))));
    assert_eq!(count_files(&images_dir(&fx)), 0);
}

#[tokio::test]
async fn given_missing_source_image_when_editing_then_not_found_without_call() {
    let fx = fixture(MockAiClient::new());
    let missing = fx._dir.path().join("nope.png");

    let result = service(&fx)
        .edit_image(&missing, "add lemons", None, None)
        .await;

    match result {
        Err(ServiceError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
async fn given_missing_mask_when_editing_then_not_found_without_call() {
    let fx = fixture(MockAiClient::new());
    let source = fx._dir.path().join("source.png");
    std::fs::write(&source, STANDARD.decode(PNG_B64).unwrap()).unwrap();

    let result = service(&fx)
        .edit_image(&source, "add lemons", Some(Path::new("/no/such/mask.png")), None)
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
    assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
async fn given_existing_image_when_editing_then_new_png_is_saved() {
    let fx = fixture(MockAiClient::new());
    let source = fx._dir.path().join("source.png");
    std::fs::write(&source, STANDARD.decode(PNG_B64).unwrap()).unwrap();

    let record = service(&fx)
        .edit_image(&source, "add lemons", None, Some("256x256"))
        .await
        .unwrap();

    assert_eq!(record.size, "256x256");
    assert!(record.path.exists());
    assert_eq!(fx.client.call_count(), 1);
}

#[tokio::test]
async fn given_style_on_model_without_style_support_when_generating_then_style_is_dropped() {
    let fx = fixture(MockAiClient::new());

    let record = service(&fx)
        .generate_image("salad", None, Some(ImageStyle::Vivid))
        .await
        .unwrap();

    assert!(record.path.exists());
    let sent = fx.client.last_image_request().unwrap();
    assert_eq!(sent.model, "dall-e-2");
    assert_eq!(sent.style, None);
}

#[tokio::test]
async fn given_style_on_style_capable_model_when_generating_then_style_is_sent() {
    let fx = fixture(MockAiClient::new());
    let service = ImageService::new(
        fx.client.clone(),
        fx.store.clone(),
        no_retry(),
        defaults(STYLE_CAPABLE_MODEL),
    );

    service
        .generate_image("salad", None, Some(ImageStyle::Natural))
        .await
        .unwrap();

    assert_eq!(
        fx.client.last_image_request().unwrap().style,
        Some(ImageStyle::Natural)
    );
}

#[tokio::test]
async fn given_write_failure_mid_batch_when_generating_images_then_no_files_remain() {
    let fx = fixture(MockAiClient::new());
    let store = Arc::new(FailingAfterStore {
        inner: fx.store.clone(),
        allowed: 2,
        writes: AtomicUsize::new(0),
    });
    let service = ImageService::new(fx.client.clone(), store, no_retry(), defaults("dall-e-2"));

    let result = service.generate_images("fruit", None, None, 3).await;

    assert!(matches!(result, Err(ServiceError::Storage(_))));
    assert_eq!(count_files(&images_dir(&fx)), 0);
}
