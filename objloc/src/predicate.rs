use url::Url;

use crate::rebuild::{AWS_HOST_SUFFIX, GOOGLE_HOST, SCHEME_GS, SCHEME_S3, eq_ignore_case, host_ends_with};

/// Cheap check for whether a locator looks like it addresses object storage
/// at all.
///
/// True if the scheme is one of the short storage schemes, the `mode` query
/// parameter mentions one of them, or the host matches a known storage
/// endpoint pattern. Callers use this to decide whether to run
/// [`crate::process_locator`]; it never fails, and a locator without a host
/// simply yields `false`.
pub fn is_object_storage_url(url: &Url) -> bool {
    let scheme = url.scheme();
    if eq_ignore_case(scheme, SCHEME_S3) || eq_ignore_case(scheme, SCHEME_GS) {
        return true;
    }

    let mode_mentions_storage = url.query_pairs().any(|(key, value)| {
        key == "mode"
            && value
                .split(',')
                .any(|m| eq_ignore_case(m.trim(), SCHEME_S3) || eq_ignore_case(m.trim(), SCHEME_GS))
    });
    if mode_mentions_storage {
        return true;
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {
            host_ends_with(host, AWS_HOST_SUFFIX) || eq_ignore_case(host, GOOGLE_HOST)
        }
        _ => false,
    }
}
