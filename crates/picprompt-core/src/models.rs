//! Domain model for the picprompt pipeline.

use std::fmt;

use uuid::Uuid;

use crate::defaults;
use crate::error::{Error, Result};
use crate::validate::file_extension;

/// One user-submitted image, read once into memory by the front end.
///
/// The filename is display metadata only; it never becomes a blob key
/// (keys are generated per upload to stay collision-free across sessions).
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Generate a unique blob key for this upload, keeping the original
    /// extension so the stored object stays recognizable as an image.
    pub fn blob_key(&self) -> String {
        match file_extension(&self.filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

/// Identity of a stored object: bucket + generated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub bucket: String,
    pub key: String,
}

impl BlobRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Ordered sequence of detected label strings, highest confidence first.
///
/// Capped at [`defaults::MAX_LABELS`]; the detector may return fewer.
/// Order is preserved as returned by the detector, never re-ranked.
/// An empty set is valid input for generation, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Build from detector output, truncating past the label cap.
    pub fn from_detected(labels: impl IntoIterator<Item = String>) -> Self {
        Self(
            labels
                .into_iter()
                .take(defaults::MAX_LABELS as usize)
                .collect(),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for LabelSet {
    /// Deterministic bracketed rendering, e.g. `["Cat", "Animal"]`.
    /// This is the textual form handed to the prompt generator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Pipeline stage an image is in, recorded on failures and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uploading,
    Detecting,
    Generating,
    CleaningUp,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Uploading => "uploading",
            Stage::Detecting => "detecting",
            Stage::Generating => "generating",
            Stage::CleaningUp => "cleaning_up",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable knobs for one text-generation call.
///
/// Constructed through [`GenerationParams::new`], which rejects
/// out-of-range values before any remote call is made. Immutable for the
/// duration of one generation call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    prompt_template: String,
}

impl GenerationParams {
    /// Validate and build generation parameters.
    ///
    /// Each numeric field must be within [0.0, 1.0] and the template must
    /// not exceed [`defaults::TEMPLATE_MAX_CHARS`] characters.
    pub fn new(
        temperature: f32,
        top_p: f32,
        frequency_penalty: f32,
        presence_penalty: f32,
        prompt_template: impl Into<String>,
    ) -> Result<Self> {
        check_unit_range("temperature", temperature)?;
        check_unit_range("top_p", top_p)?;
        check_unit_range("frequency_penalty", frequency_penalty)?;
        check_unit_range("presence_penalty", presence_penalty)?;

        let prompt_template = prompt_template.into();
        let template_chars = prompt_template.chars().count();
        if template_chars > defaults::TEMPLATE_MAX_CHARS {
            return Err(Error::Validation(format!(
                "prompt template is {} characters, maximum is {}",
                template_chars,
                defaults::TEMPLATE_MAX_CHARS
            )));
        }

        Ok(Self {
            temperature,
            top_p,
            frequency_penalty,
            presence_penalty,
            prompt_template,
        })
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn frequency_penalty(&self) -> f32 {
        self.frequency_penalty
    }

    pub fn presence_penalty(&self) -> f32 {
        self.presence_penalty
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: defaults::DEFAULT_TOP_P,
            frequency_penalty: defaults::DEFAULT_FREQUENCY_PENALTY,
            presence_penalty: defaults::DEFAULT_PRESENCE_PENALTY,
            prompt_template: defaults::DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

fn check_unit_range(field: &str, value: f32) -> Result<()> {
    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Validation(format!(
            "{} must be within [0.0, 1.0], got {}",
            field, value
        )));
    }
    Ok(())
}

/// Per-image result surfaced to the front end.
///
/// On success `result` holds the generated text; on failure it holds the
/// error that ended this image's leg and `failed_stage` names where.
#[derive(Debug)]
pub struct ImageOutcome {
    pub filename: String,
    /// Blob key the image was stored under, if the upload happened.
    pub key: Option<String>,
    pub result: Result<String>,
    pub failed_stage: Option<Stage>,
}

impl ImageOutcome {
    pub fn success(filename: impl Into<String>, key: impl Into<String>, text: String) -> Self {
        Self {
            filename: filename.into(),
            key: Some(key.into()),
            result: Ok(text),
            failed_stage: None,
        }
    }

    pub fn failure(
        filename: impl Into<String>,
        key: Option<String>,
        stage: Stage,
        error: Error,
    ) -> Self {
        Self {
            filename: filename.into(),
            key,
            result: Err(error),
            failed_stage: Some(stage),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
