//! # picprompt-inference
//!
//! Remote inference backends for picprompt.
//!
//! This crate provides:
//! - Pluggable label detection trait with an AWS Rekognition implementation
//! - Pluggable prompt generation trait with an OpenAI completions
//!   implementation
//!
//! Both capabilities are blocking network calls from the pipeline's
//! perspective; each imposes a bounded timeout and surfaces failures as
//! [`picprompt_core::Error`] variants without retrying.

pub mod detector;
pub mod openai;

// Re-export core types
pub use picprompt_core::*;

pub use detector::{LabelDetector, RekognitionDetector};
pub use openai::{OpenAiConfig, OpenAiGenerator, PromptGenerator};
