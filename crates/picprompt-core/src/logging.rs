//! Structured logging field name constants for picprompt.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.

/// Subsystem originating the log event.
/// Values: "storage", "inference", "pipeline", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "s3", "rekognition", "openai"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "put", "delete", "detect", "generate"
pub const OPERATION: &str = "op";

/// Original filename of the image being processed.
pub const IMAGE: &str = "image";

/// Blob key of the uploaded object.
pub const KEY: &str = "key";

/// Pipeline stage an image is in (or failed at).
pub const STAGE: &str = "stage";

/// Number of labels detected for an image.
pub const LABEL_COUNT: &str = "label_count";

/// Byte length of a prompt or response.
pub const PROMPT_LEN: &str = "prompt_len";

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
