//! Centralized default constants for picprompt.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// DETECTION
// =============================================================================

/// Maximum number of labels requested per image. The detector may return
/// fewer. Fixed by design, not user-tunable.
pub const MAX_LABELS: u32 = 7;

// =============================================================================
// GENERATION
// =============================================================================

/// Output token budget per generation call. Fixed by design.
pub const MAX_COMPLETION_TOKENS: u32 = 256;

/// Maximum prompt template length in characters.
pub const TEMPLATE_MAX_CHARS: usize = 350;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default nucleus-sampling cutoff.
pub const DEFAULT_TOP_P: f32 = 1.0;

/// Default frequency penalty.
pub const DEFAULT_FREQUENCY_PENALTY: f32 = 0.0;

/// Default presence penalty.
pub const DEFAULT_PRESENCE_PENALTY: f32 = 0.0;

/// Stock instruction text prefixed to the detected label list.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Make a list of ten interesting and elaborate prompts for image generation based on these labels in an image, start with 'an' and bonus points for adding art styles and artists. Separate instructions with ,";

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default completion model.
pub const DEFAULT_GEN_MODEL: &str = "text-davinci-003";

// =============================================================================
// STORAGE
// =============================================================================

/// Default S3 bucket for in-flight image blobs.
pub const DEFAULT_BUCKET: &str = "picpromptbucket";

// =============================================================================
// NETWORK
// =============================================================================

/// Default timeout in seconds for each remote call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// API key for the text-generation service. Required.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Override for the OpenAI API base URL.
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Override for the completion model.
pub const ENV_OPENAI_GEN_MODEL: &str = "OPENAI_GEN_MODEL";

/// Override for the remote-call timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PICPROMPT_TIMEOUT_SECS";

/// Override for the blob bucket name.
pub const ENV_BUCKET: &str = "PICPROMPT_BUCKET";

/// Optional custom S3 endpoint (e.g. MinIO in development).
pub const ENV_S3_ENDPOINT: &str = "PICPROMPT_S3_ENDPOINT";
