//! Chart upload to S3.
//!
//! Upload failure is never fatal: by the time the store runs, the dashboard
//! is already rendered and saved locally, so a failed push must not discard
//! that work. Every failure mode folds into [`UploadOutcome`] instead of an
//! error type — callers branch on the variant, not on message text.
//!
//! Missing credentials are resolved explicitly before the PUT is attempted,
//! so that case is distinguishable from a generic upload failure.

use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::path::Path;

/// Fallback when no region is configured in the environment.
const DEFAULT_REGION: &str = "us-east-1";

/// Result of one upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { bucket: String, key: String },
    NoCredentials,
    Failed(String),
}

impl UploadOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }

    /// One-line status message for stdout.
    pub fn describe(&self) -> String {
        match self {
            UploadOutcome::Uploaded { bucket, key } => {
                format!("Visualization uploaded to s3://{bucket}/{key}")
            }
            UploadOutcome::NoCredentials => {
                "No AWS credentials found. Make sure your credentials are configured correctly."
                    .to_string()
            }
            UploadOutcome::Failed(err) => {
                format!("An error occurred while uploading: {err}")
            }
        }
    }
}

/// Destination for a rendered chart. Abstracted so tests can exercise the
/// pipeline's non-fatal upload handling without AWS.
pub trait ChartStore {
    /// Human-readable destination, e.g. `s3://bucket/key`.
    fn destination(&self) -> String;

    /// Attempt exactly one upload. No retry, no read-back verification.
    fn put(&self, file: &Path) -> UploadOutcome;
}

/// S3-backed store. Uploads with the `public-read` canned ACL.
pub struct S3ChartStore {
    bucket: String,
    key: String,
}

impl S3ChartStore {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    async fn put_object(&self, file: &Path) -> UploadOutcome {
        let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        // Resolve credentials up front so "no credentials" gets its own branch.
        let Some(provider) = config.credentials_provider() else {
            return UploadOutcome::NoCredentials;
        };
        if provider.provide_credentials().await.is_err() {
            return UploadOutcome::NoCredentials;
        }

        let body = match ByteStream::from_path(file).await {
            Ok(body) => body,
            Err(e) => return UploadOutcome::Failed(error_chain(&e)),
        };

        let client = Client::new(&config);
        let result = client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type("image/png")
            .body(body)
            .send()
            .await;

        match result {
            Ok(_) => UploadOutcome::Uploaded {
                bucket: self.bucket.clone(),
                key: self.key.clone(),
            },
            Err(e) => UploadOutcome::Failed(error_chain(&e)),
        }
    }
}

impl ChartStore for S3ChartStore {
    fn destination(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }

    fn put(&self, file: &Path) -> UploadOutcome {
        // The rest of the pipeline is synchronous; the SDK is not. One
        // single-threaded runtime scoped to the upload keeps the seam small.
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => return UploadOutcome::Failed(e.to_string()),
        };

        runtime.block_on(self.put_object(file))
    }
}

/// Flatten an error and its sources into one line. The SDK's top-level
/// Display often hides the useful cause ("service error" with the real
/// reason two levels down).
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
