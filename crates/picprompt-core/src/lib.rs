//! # picprompt-core
//!
//! Core types, errors, and validation for the picprompt pipeline.
//!
//! This crate provides the domain model shared by the storage, inference,
//! and pipeline crates: uploads, blob references, label sets, generation
//! parameters, the error taxonomy, and the default constants every other
//! crate references instead of defining its own magic numbers.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{BlobRef, GenerationParams, ImageOutcome, ImageUpload, LabelSet, Stage};
pub use validate::{detect_image_type, file_extension, validate_upload};
