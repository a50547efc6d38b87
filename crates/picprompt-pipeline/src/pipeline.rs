//! Batch orchestration: validate, upload, detect, generate, clean up.

use std::sync::Arc;
use std::time::Instant;

use picprompt_core::{
    defaults, validate_upload, BlobRef, Error, GenerationParams, ImageOutcome, ImageUpload, Stage,
};
use picprompt_inference::{LabelDetector, PromptGenerator};
use picprompt_storage::BlobStore;
use tracing::{debug, info, warn};

/// An image that survived validation and upload, awaiting its
/// detect → generate leg.
struct StoredImage {
    filename: String,
    key: String,
}

/// Orchestrates one user-submitted batch through the pipeline.
///
/// Backends are injected as trait objects, so tests can swap any of the
/// three remote collaborators for in-process doubles.
pub struct PromptPipeline {
    store: Arc<dyn BlobStore>,
    detector: Arc<dyn LabelDetector>,
    generator: Arc<dyn PromptGenerator>,
}

impl PromptPipeline {
    pub fn new(
        store: Arc<dyn BlobStore>,
        detector: Arc<dyn LabelDetector>,
        generator: Arc<dyn PromptGenerator>,
    ) -> Self {
        Self {
            store,
            detector,
            generator,
        }
    }

    /// Process a batch of uploads with the user's generation parameters.
    ///
    /// All uploads are stored before any detection begins. Each image then
    /// proceeds through its own detect → generate leg; one image's failure
    /// ends only that image's leg. Returns one outcome per input image, in
    /// input order.
    pub async fn process_batch(
        &self,
        uploads: Vec<ImageUpload>,
        params: &GenerationParams,
    ) -> Vec<ImageOutcome> {
        let start = Instant::now();
        let batch_size = uploads.len();
        info!(
            subsystem = "pipeline",
            op = "process_batch",
            batch_size = batch_size,
        );

        // Upload phase, batch-synchronized: every surviving image is
        // stored before the first detection call.
        let mut legs: Vec<Result<StoredImage, ImageOutcome>> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            legs.push(self.upload_one(upload).await);
        }

        // Per-image legs, independent of each other.
        let mut outcomes = Vec::with_capacity(legs.len());
        for leg in legs {
            match leg {
                Ok(stored) => outcomes.push(self.run_leg(stored, params).await),
                Err(failed) => outcomes.push(failed),
            }
        }

        info!(
            subsystem = "pipeline",
            op = "process_batch",
            batch_size = batch_size,
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            duration_ms = start.elapsed().as_millis() as u64,
        );
        outcomes
    }

    /// Validate and upload one image under a freshly generated key.
    async fn upload_one(&self, upload: ImageUpload) -> Result<StoredImage, ImageOutcome> {
        if let Err(e) = validate_upload(&upload) {
            return Err(ImageOutcome::failure(
                upload.filename,
                None,
                Stage::Uploading,
                e,
            ));
        }

        // Keys are generated per upload; the filename stays display-only
        // so concurrent sessions can never collide in the bucket.
        let key = upload.blob_key();
        let ImageUpload { filename, bytes } = upload;

        debug!(
            subsystem = "pipeline",
            stage = %Stage::Uploading,
            image = %filename,
            key = %key,
        );
        match self.store.put(&key, bytes).await {
            Ok(()) => Ok(StoredImage { filename, key }),
            Err(e) => Err(ImageOutcome::failure(
                filename,
                Some(key),
                Stage::Uploading,
                e,
            )),
        }
    }

    /// Run one stored image's detect → generate leg, deleting the blob on
    /// every exit path.
    async fn run_leg(&self, stored: StoredImage, params: &GenerationParams) -> ImageOutcome {
        let blob = BlobRef::new(self.store.bucket(), &stored.key);

        let result = self.detect_and_generate(&blob, &stored.filename, params).await;

        // Cleanup happens whether the leg succeeded or not; temporary
        // storage must not outlive the request. A failed delete is logged
        // and does not replace the leg's primary result.
        if let Err(e) = self.store.delete(&stored.key).await {
            warn!(
                subsystem = "pipeline",
                stage = %Stage::CleaningUp,
                image = %stored.filename,
                key = %stored.key,
                error = %e,
                "failed to delete temporary blob"
            );
        }

        match result {
            Ok(text) => ImageOutcome::success(stored.filename, stored.key, text),
            Err((stage, e)) => {
                ImageOutcome::failure(stored.filename, Some(stored.key), stage, e)
            }
        }
    }

    async fn detect_and_generate(
        &self,
        blob: &BlobRef,
        filename: &str,
        params: &GenerationParams,
    ) -> Result<String, (Stage, Error)> {
        debug!(
            subsystem = "pipeline",
            stage = %Stage::Detecting,
            image = %filename,
            key = %blob.key,
        );
        let labels = self
            .detector
            .detect(blob, defaults::MAX_LABELS)
            .await
            .map_err(|e| (Stage::Detecting, e))?;

        debug!(
            subsystem = "pipeline",
            stage = %Stage::Generating,
            image = %filename,
            key = %blob.key,
            label_count = labels.len(),
        );
        let text = self
            .generator
            .generate(&labels, params)
            .await
            .map_err(|e| (Stage::Generating, e))?;

        Ok(text)
    }
}
