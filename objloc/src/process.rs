use url::Url;

use crate::{ConfigDefaults, LocatorError, StorageInfo, rebuild::rebuild_locator};

/// Profile marker recorded when no credential profile is configured.
const NO_PROFILE: &str = "no";

/// Process a locator into its canonical form and populate `info`.
///
/// This is the entry point used by the data access layer. It resolves the
/// active credential profile, rebuilds the locator via
/// [`rebuild_locator`] (the record's prior `region`/`bucket` act as
/// fallbacks), records the canonical host, and derives `rootkey` as the
/// canonical path with the leading bucket segment stripped.
///
/// On error the record may be partially populated and should be discarded.
pub fn process_locator(
    url: &Url,
    info: &mut StorageInfo,
    defaults: &dyn ConfigDefaults,
) -> Result<Url, LocatorError> {
    info.profile = Some(
        defaults
            .active_profile(url)
            .unwrap_or_else(|| NO_PROFILE.to_string()),
    );

    let canonical = rebuild_locator(url, Some(&mut *info), defaults)?;

    info.host = canonical.host_str().map(str::to_string);

    // The first canonical path segment is the bucket, already recorded.
    let mut segments: Vec<&str> = canonical
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if !segments.is_empty() {
        segments.remove(0);
    }
    info.rootkey = Some(segments.join("/"));

    Ok(canonical)
}
