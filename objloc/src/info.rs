/// The service family a locator addresses.
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageService {
    /// The host matched no known storage endpoint pattern.
    #[default]
    Unknown,
    /// An S3-compatible endpoint.
    S3,
    /// A Google Cloud Storage endpoint.
    Gcs,
}

impl StorageService {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageService::Unknown => "unknown",
            StorageService::S3 => "s3",
            StorageService::Gcs => "gcs",
        }
    }
}

impl std::fmt::Display for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured result of processing a locator.
///
/// Filled progressively by [`crate::process_locator`]; a previously populated
/// record may also be passed back in, in which case its `region` and `bucket`
/// serve as fallbacks for locators that do not carry them.
///
/// `host`, `region`, `bucket` and `profile` are `None` or non-empty.
/// `rootkey` is `None` until processing and may legitimately be `Some("")`
/// afterwards: a locator whose path is just the bucket has an empty key
/// prefix.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageInfo {
    /// Normalized endpoint host.
    pub host: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    /// Object key prefix, with the leading bucket segment stripped.
    pub rootkey: Option<String>,
    /// Name of the credential profile to use.
    pub profile: Option<String>,
    pub service: StorageService,
}

impl StorageInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field.
    ///
    /// Idempotent; a cleared record can be reused for another
    /// [`crate::process_locator`] call.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Display for StorageInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn or_null(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("null")
        }

        write!(
            f,
            "host={} region={} bucket={} rootkey={} profile={}",
            or_null(&self.host),
            or_null(&self.region),
            or_null(&self.bucket),
            or_null(&self.rootkey),
            or_null(&self.profile),
        )
    }
}
