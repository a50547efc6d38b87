//! Label detection traits and the AWS Rekognition implementation.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, Label, S3Object};
use picprompt_core::{defaults, BlobRef, Error, LabelSet, Result};
use tracing::debug;

/// Backend for detecting descriptive labels in a stored image.
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detect up to `max_labels` labels for the referenced blob, highest
    /// confidence first. The service may return fewer.
    ///
    /// Fails with a detection error if the blob does not exist, is not a
    /// decodable image, or the remote call errors out.
    async fn detect(&self, blob: &BlobRef, max_labels: u32) -> Result<LabelSet>;
}

/// AWS Rekognition label detector.
///
/// Reads the image directly from S3 by bucket + key, so the blob must be
/// uploaded before detection. Credentials come from the ambient AWS
/// credential chain.
pub struct RekognitionDetector {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionDetector {
    pub fn new(client: aws_sdk_rekognition::Client) -> Self {
        Self { client }
    }

    /// Create from the ambient AWS configuration (environment, profile,
    /// instance role). Each DetectLabels call is bounded by the shared
    /// remote-call timeout, `PICPROMPT_TIMEOUT_SECS` or the default.
    pub async fn from_env() -> Self {
        let timeout_seconds = std::env::var(defaults::ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults::DEFAULT_TIMEOUT_SECS);
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .timeout_config(operation_timeout(timeout_seconds))
            .load()
            .await;
        Self::new(aws_sdk_rekognition::Client::new(&config))
    }
}

fn operation_timeout(seconds: u64) -> TimeoutConfig {
    TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(seconds))
        .build()
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    async fn detect(&self, blob: &BlobRef, max_labels: u32) -> Result<LabelSet> {
        debug!(
            subsystem = "inference",
            component = "rekognition",
            op = "detect",
            key = %blob.key,
            max_labels = max_labels,
        );

        let s3_object = S3Object::builder()
            .bucket(&blob.bucket)
            .name(&blob.key)
            .build();
        let image = Image::builder().s3_object(s3_object).build();

        let response = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(max_labels as i32)
            .send()
            .await
            .map_err(|e| {
                Error::Detection(format!(
                    "DetectLabels failed for {}: {}",
                    blob,
                    DisplayErrorContext(&e)
                ))
            })?;

        let labels = LabelSet::from_detected(label_names(response.labels()));

        debug!(
            subsystem = "inference",
            component = "rekognition",
            op = "detect",
            key = %blob.key,
            label_count = labels.len(),
        );

        Ok(labels)
    }
}

/// Map Rekognition labels to their names, preserving service order
/// (highest confidence first). Confidence values are dropped; the
/// pipeline uses only the names.
fn label_names(labels: &[Label]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| label.name().map(str::to_string))
        .collect()
}
