use url::Url;

/// Failures produced while classifying or rebuilding a locator.
///
/// All of these are deterministic parse/configuration failures. Callers
/// should surface them as locator-rejection errors rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// The locator has no usable host, or its host does not match any
    /// recognized address shape.
    #[error("malformed object storage locator '{url}': {reason}")]
    MalformedLocator { url: String, reason: String },

    /// No region in the host, no prior record region, and no configured
    /// default.
    #[error("could not resolve a region for object storage locator '{url}'")]
    RegionUnresolved { url: String },

    /// No bucket in the host, no leading path segment, and no prior record
    /// bucket.
    #[error("could not resolve a bucket for object storage locator '{url}'")]
    BucketUnresolved { url: String },
}

impl LocatorError {
    pub(crate) fn malformed(url: &Url, reason: impl Into<String>) -> Self {
        Self::MalformedLocator {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn region_unresolved(url: &Url) -> Self {
        Self::RegionUnresolved {
            url: url.to_string(),
        }
    }

    pub(crate) fn bucket_unresolved(url: &Url) -> Self {
        Self::BucketUnresolved {
            url: url.to_string(),
        }
    }
}
