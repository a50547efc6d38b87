//! # picprompt-pipeline
//!
//! The upload/detect/generate/cleanup orchestrator.
//!
//! One batch at a time: every surviving image is uploaded before any
//! detection starts, then each image runs its own detect/generate leg
//! independently. A leg's failure never affects another image, and the
//! uploaded blob is deleted on every exit path of its leg, failed legs
//! included.

pub mod pipeline;

pub use pipeline::PromptPipeline;
