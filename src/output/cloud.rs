//! Object storage upload (S3, R2, GCS, Azure, local)

use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// Build a Hive-style partitioned key for an uploaded file
///
/// Format: `{name}/dt={YYYY-MM-DD}/data.{ext}`
///
/// Examples:
/// - `nation/dt=2025-12-14/data.csv`
/// - `tpch_sf1_orders/dt=2025-12-14/data.csv`
pub fn build_partitioned_path(name: &str, extension: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    let sanitized = name.replace('.', "_");
    format!("{sanitized}/dt={date}/data.{extension}")
}

/// Upload destination parsed from a URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Bucket, container or local directory (for logging)
    bucket: String,
    scheme: String,
}

impl CloudDestination {
    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path/` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// S3 bucket in an explicit region; credentials come from the environment
    pub fn s3(bucket: &str, region: Option<&str>) -> Result<Self> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = region {
            builder = builder.with_region(region);
        }
        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create s3 client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            bucket: bucket.to_string(),
            scheme: "s3".to_string(),
        })
    }

    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = split_bucket(url, scheme)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // AWS_ENDPOINT is read by from_env(); R2 also has its own variable
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            bucket: bucket.to_string(),
            scheme: scheme.to_string(),
        })
    }

    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            bucket: bucket.to_string(),
            scheme: "gs".to_string(),
        })
    }

    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            bucket: container.to_string(),
            scheme: "az".to_string(),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            bucket: path.to_string(),
            scheme: "file".to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Get the bucket, container or local directory
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_path(&self, key: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{key}", self.prefix.trim_end_matches('/')))
        }
    }

    /// Write bytes under `key`, returning the full location
    pub async fn write(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::upload(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{}/{path}", self.scheme, self.bucket.trim_end_matches('/')))
    }

    /// Upload a local file as-is under `key`
    pub async fn upload_file(&self, local_path: impl AsRef<Path>, key: &str) -> Result<String> {
        let local_path = local_path.as_ref();
        let data = tokio::fs::read(local_path).await.map_err(|e| {
            Error::upload(format!("Failed to open file {}: {e}", local_path.display()))
        })?;
        let size = data.len();

        let location = self.write(key, Bytes::from(data)).await?;
        tracing::info!(
            "Uploaded {} ({size} bytes) to {location}",
            local_path.display()
        );
        Ok(location)
    }
}

/// Split `scheme://bucket/prefix` into bucket and prefix
fn split_bucket<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
    let without_scheme = url
        .strip_prefix(&format!("{scheme}://"))
        .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

    let (bucket, prefix) = match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].to_string(),
        ),
        None => (without_scheme, String::new()),
    };

    if bucket.is_empty() {
        return Err(Error::config(format!("Missing bucket in {scheme} URL: {url}")));
    }

    Ok((bucket, prefix))
}
