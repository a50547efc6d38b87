//! S3 connection configuration.

use picprompt_core::defaults;

/// Configuration for the S3 blob store.
///
/// Credentials are optional: when unset, opendal falls back to the
/// ambient AWS credential chain (environment, profile, instance role).
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Per-operation timeout in seconds; a stuck put or delete must not
    /// hang the request.
    pub timeout_seconds: u64,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            timeout_seconds: defaults::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables, falling back to the default
    /// bucket name.
    ///
    /// - `PICPROMPT_BUCKET`: bucket name
    /// - `PICPROMPT_S3_ENDPOINT`: custom endpoint (e.g. MinIO)
    /// - `PICPROMPT_TIMEOUT_SECS`: per-operation timeout
    /// - `AWS_REGION`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`:
    ///   standard AWS variables, all optional here since opendal also
    ///   resolves them through the ambient chain
    pub fn from_env() -> Self {
        Self {
            bucket: std::env::var(defaults::ENV_BUCKET)
                .unwrap_or_else(|_| defaults::DEFAULT_BUCKET.to_string()),
            region: std::env::var("AWS_REGION").ok(),
            endpoint: std::env::var(defaults::ENV_S3_ENDPOINT).ok(),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            timeout_seconds: std::env::var(defaults::ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_bucket_only() {
        let config = S3Config::new("my-bucket");
        assert_eq!(config.bucket, "my-bucket");
        assert!(config.region.is_none());
        assert!(config.endpoint.is_none());
        assert!(config.access_key_id.is_none());
        assert!(config.secret_access_key.is_none());
        assert_eq!(config.timeout_seconds, defaults::DEFAULT_TIMEOUT_SECS);
    }
}
