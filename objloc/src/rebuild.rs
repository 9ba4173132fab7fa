use url::Url;

use crate::{ConfigDefaults, LocatorError, StorageInfo, StorageService};

/// Host suffix shared by all AWS-style S3 endpoints.
pub(crate) const AWS_HOST_SUFFIX: &str = ".amazonaws.com";

/// The single fixed endpoint host of Google Cloud Storage.
pub(crate) const GOOGLE_HOST: &str = "storage.googleapis.com";

/// Short locator scheme for S3 (`s3://bucket/key`).
pub(crate) const SCHEME_S3: &str = "s3";

/// Short locator scheme for Google Cloud Storage (`gs3://bucket/key`).
pub(crate) const SCHEME_GS: &str = "gs3";

/// Scheme of every canonical locator.
const CANONICAL_SCHEME: &str = "https";

/// All literal comparisons on hosts, host segments and schemes are
/// case-insensitive and go through these two helpers.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub(crate) fn host_ends_with(host: &str, suffix: &str) -> bool {
    let (host, suffix) = (host.as_bytes(), suffix.as_bytes());
    host.len() >= suffix.len() && host[host.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Loose check for an S3 bucket name occupying a single host segment.
///
/// Used only to disambiguate the 4-segment AWS host case; buckets taken from
/// the path or a prior record are accepted as-is.
fn is_bucket_token(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    (3..=63).contains(&bytes.len())
        && bytes.iter().all(|&b| alnum(b) || b == b'-')
        && alnum(bytes[0])
        && alnum(bytes[bytes.len() - 1])
}

/// Address shape of a locator, as recognized by [`classify`].
///
/// Purely transient classification state; never stored in a
/// [`StorageInfo`] record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LocatorShape {
    /// `s3://<bucket>/<key>` or `gs3://<bucket>/<key>`.
    SchemePrefixed,
    /// `https://<bucket>.s3[.<region>].amazonaws.com/<key>`.
    VirtualHosted,
    /// `https://s3.<region>.amazonaws.com/<bucket>/<key>`.
    PathStyle,
    /// `https://s3.amazonaws.com/...`: an AWS host carrying neither region
    /// nor bucket.
    BareService,
    /// The fixed Google Cloud Storage endpoint host.
    FixedHost,
    /// Any other host, preserved verbatim.
    Other,
}

#[derive(Debug)]
struct Classified {
    shape: LocatorShape,
    service: StorageService,
    /// Bucket embedded in the host, if any.
    bucket: Option<String>,
    /// Region embedded in the host, if any.
    region: Option<String>,
}

/// Decide which address shape the locator has and pull region/bucket out of
/// the host. The first matching rule wins.
fn classify(url: &Url, host: &str, host_segments: &[&str]) -> Result<Classified, LocatorError> {
    let scheme = url.scheme();

    if eq_ignore_case(scheme, SCHEME_S3) && host_segments.len() == 1 {
        return Ok(Classified {
            shape: LocatorShape::SchemePrefixed,
            service: StorageService::S3,
            bucket: Some(host_segments[0].to_string()),
            region: None,
        });
    }

    if eq_ignore_case(scheme, SCHEME_GS) && host_segments.len() == 1 {
        return Ok(Classified {
            shape: LocatorShape::SchemePrefixed,
            service: StorageService::Gcs,
            bucket: Some(host_segments[0].to_string()),
            region: None,
        });
    }

    if host_ends_with(host, AWS_HOST_SUFFIX) {
        return match host_segments {
            // s3.amazonaws.com
            [_, _, _] => Ok(Classified {
                shape: LocatorShape::BareService,
                service: StorageService::S3,
                bucket: None,
                region: None,
            }),
            // s3.<region>.amazonaws.com
            [first, region, _, _] if eq_ignore_case(first, SCHEME_S3) => Ok(Classified {
                shape: LocatorShape::PathStyle,
                service: StorageService::S3,
                bucket: None,
                region: Some(region.to_string()),
            }),
            // <bucket>.s3.amazonaws.com
            [bucket, _, _, _] if is_bucket_token(bucket) => Ok(Classified {
                shape: LocatorShape::VirtualHosted,
                service: StorageService::S3,
                bucket: Some(bucket.to_string()),
                region: None,
            }),
            [first, _, _, _] => Err(LocatorError::malformed(
                url,
                format!("host segment '{first}' is neither 's3' nor a bucket name"),
            )),
            // <bucket>.s3.<region>.amazonaws.com
            [bucket, second, region, _, _] if eq_ignore_case(second, SCHEME_S3) => {
                Ok(Classified {
                    shape: LocatorShape::VirtualHosted,
                    service: StorageService::S3,
                    bucket: Some(bucket.to_string()),
                    region: Some(region.to_string()),
                })
            }
            [_, second, _, _, _] => Err(LocatorError::malformed(
                url,
                format!("expected 's3' as second host segment, got '{second}'"),
            )),
            _ => Err(LocatorError::malformed(
                url,
                format!("unrecognized AWS host with {} segments", host_segments.len()),
            )),
        };
    }

    if eq_ignore_case(host, GOOGLE_HOST) {
        return Ok(Classified {
            shape: LocatorShape::FixedHost,
            service: StorageService::Gcs,
            bucket: None,
            region: None,
        });
    }

    Ok(Classified {
        shape: LocatorShape::Other,
        service: StorageService::Unknown,
        bucket: None,
        region: None,
    })
}

/// Serialize the canonical locator from its components, carrying userinfo,
/// port, query and fragment over from the original.
fn serialize_canonical(original: &Url, host: &str, path: &str) -> Result<Url, LocatorError> {
    let mut text = String::with_capacity(original.as_str().len() + host.len() + path.len());
    text.push_str(CANONICAL_SCHEME);
    text.push_str("://");
    if !original.username().is_empty() {
        text.push_str(original.username());
        if let Some(password) = original.password() {
            text.push(':');
            text.push_str(password);
        }
        text.push('@');
    }
    text.push_str(host);
    if let Some(port) = original.port() {
        text.push(':');
        text.push_str(&port.to_string());
    }
    text.push_str(path);
    if let Some(query) = original.query() {
        text.push('?');
        text.push_str(query);
    }
    if let Some(fragment) = original.fragment() {
        text.push('#');
        text.push_str(fragment);
    }

    Url::parse(&text)
        .map_err(|err| LocatorError::malformed(original, format!("rebuilt locator does not parse: {err}")))
}

/// Rebuild a locator into the canonical path-style `https` form.
///
/// Region and bucket are settled with a fixed precedence: recovered from the
/// host, then taken from the prior `info` record, then (for the region) from
/// the configured default. On success the returned locator always carries an
/// explicit bucket as its first path segment, and `info` (when supplied)
/// holds the resolved bucket, region and service tag.
pub fn rebuild_locator(
    url: &Url,
    info: Option<&mut StorageInfo>,
    defaults: &dyn ConfigDefaults,
) -> Result<Url, LocatorError> {
    let host = url.host_str().unwrap_or("");
    if host.is_empty() {
        return Err(LocatorError::malformed(url, "locator has no host"));
    }

    let host_segments: Vec<&str> = host.split('.').filter(|s| !s.is_empty()).collect();
    let mut path_segments: Vec<String> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let classified = classify(url, host, &host_segments)?;

    // Region: host, then prior record, then configured default.
    let region = match classified.region {
        Some(region) => region,
        None => match info.as_deref().and_then(|i| i.region.clone()) {
            Some(region) => region,
            None => defaults
                .default_region(url)
                .ok_or_else(|| LocatorError::region_unresolved(url))?,
        },
    };

    // Bucket: host, then leading path segment, then prior record.
    let bucket = match classified.bucket {
        Some(bucket) => bucket,
        None if !path_segments.is_empty() => path_segments.remove(0),
        None => info
            .as_deref()
            .and_then(|i| i.bucket.clone())
            .ok_or_else(|| LocatorError::bucket_unresolved(url))?,
    };

    let new_host = match classified.service {
        StorageService::S3 => format!("{SCHEME_S3}.{region}{AWS_HOST_SUFFIX}"),
        StorageService::Gcs => GOOGLE_HOST.to_string(),
        StorageService::Unknown => host.to_string(),
    };

    let mut new_path = String::with_capacity(url.path().len() + bucket.len() + 1);
    new_path.push('/');
    new_path.push_str(&bucket);
    for segment in &path_segments {
        new_path.push('/');
        new_path.push_str(segment);
    }

    let canonical = serialize_canonical(url, &new_host, &new_path)?;

    tracing::debug!(
        locator = %canonical,
        shape = ?classified.shape,
        bucket = %bucket,
        region = %region,
        "rebuilt storage locator"
    );

    if let Some(info) = info {
        info.bucket = Some(bucket);
        info.region = Some(region);
        info.service = classified.service;
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{NoDefaults, StaticDefaults};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    /// Rebuild with an empty record and a single configured default region.
    fn rebuilt(input: &str, default_region: &str) -> (Url, StorageInfo) {
        let mut info = StorageInfo::new();
        let out = rebuild_locator(
            &url(input),
            Some(&mut info),
            &StaticDefaults::with_region(default_region),
        )
        .unwrap();
        (out, info)
    }

    #[test]
    fn scheme_prefixed_s3() {
        let (out, info) = rebuilt("s3://mybucket/data/chunk.nc", "us-west-2");
        assert_eq!(
            out.as_str(),
            "https://s3.us-west-2.amazonaws.com/mybucket/data/chunk.nc"
        );
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.region.as_deref(), Some("us-west-2"));
        assert_eq!(info.service, StorageService::S3);
    }

    #[test]
    fn scheme_prefixed_gcs() {
        let (out, info) = rebuilt("gs3://mybucket/obj", "us-east-1");
        assert_eq!(out.as_str(), "https://storage.googleapis.com/mybucket/obj");
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.region.as_deref(), Some("us-east-1"));
        assert_eq!(info.service, StorageService::Gcs);
    }

    #[test]
    fn bare_aws_host() {
        let (out, info) = rebuilt("https://s3.amazonaws.com/mybucket/key", "eu-west-1");
        assert_eq!(
            out.as_str(),
            "https://s3.eu-west-1.amazonaws.com/mybucket/key"
        );
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn virtual_hosted_without_region() {
        let (out, info) = rebuilt("https://mybucket.s3.amazonaws.com/key", "us-east-1");
        assert_eq!(out.as_str(), "https://s3.us-east-1.amazonaws.com/mybucket/key");
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn path_style_with_region() {
        // Region comes from the host, so no defaults are needed.
        let mut info = StorageInfo::new();
        let out = rebuild_locator(
            &url("https://s3.eu-central-1.amazonaws.com/mybucket/key"),
            Some(&mut info),
            &NoDefaults,
        )
        .unwrap();
        assert_eq!(
            out.as_str(),
            "https://s3.eu-central-1.amazonaws.com/mybucket/key"
        );
        assert_eq!(info.region.as_deref(), Some("eu-central-1"));
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
    }

    #[test]
    fn virtual_hosted_with_region() {
        let mut info = StorageInfo::new();
        let out = rebuild_locator(
            &url("https://mybucket.s3.ap-south-1.amazonaws.com/a/b"),
            Some(&mut info),
            &NoDefaults,
        )
        .unwrap();
        assert_eq!(
            out.as_str(),
            "https://s3.ap-south-1.amazonaws.com/mybucket/a/b"
        );
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.region.as_deref(), Some("ap-south-1"));
        assert_eq!(info.service, StorageService::S3);
    }

    #[test]
    fn google_fixed_host() {
        let (out, info) = rebuilt("https://storage.googleapis.com/mybucket/obj", "us-east-1");
        assert_eq!(out.as_str(), "https://storage.googleapis.com/mybucket/obj");
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.service, StorageService::Gcs);
    }

    #[test]
    fn other_host_preserved() {
        let (out, info) = rebuilt("http://minio.example.com:9000/mybucket/data/x", "us-east-1");
        assert_eq!(
            out.as_str(),
            "https://minio.example.com:9000/mybucket/data/x"
        );
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(info.service, StorageService::Unknown);
    }

    #[test]
    fn canonical_form_is_a_fixpoint() {
        let (first, info1) = rebuilt("https://mybucket.s3.amazonaws.com/a/b/c", "us-east-1");
        let mut info2 = StorageInfo::new();
        let second = rebuild_locator(&first, Some(&mut info2), &NoDefaults).unwrap();
        assert_eq!(first, second);
        assert_eq!(info1.bucket, info2.bucket);
        assert_eq!(info1.region, info2.region);
    }

    #[test]
    fn query_and_fragment_carry_over() {
        let (out, _) = rebuilt("s3://mybucket/key?mode=bytes#frag", "us-east-1");
        assert_eq!(
            out.as_str(),
            "https://s3.us-east-1.amazonaws.com/mybucket/key?mode=bytes#frag"
        );
    }

    #[test]
    fn region_from_host_wins_over_record_and_default() {
        let mut info = StorageInfo {
            region: Some("us-west-1".to_string()),
            ..Default::default()
        };
        rebuild_locator(
            &url("https://s3.eu-central-1.amazonaws.com/b/k"),
            Some(&mut info),
            &StaticDefaults::with_region("us-east-1"),
        )
        .unwrap();
        assert_eq!(info.region.as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn region_from_record_wins_over_default() {
        let mut info = StorageInfo {
            region: Some("us-west-1".to_string()),
            ..Default::default()
        };
        let out = rebuild_locator(
            &url("s3://mybucket/k"),
            Some(&mut info),
            &StaticDefaults::with_region("us-east-1"),
        )
        .unwrap();
        assert_eq!(out.as_str(), "https://s3.us-west-1.amazonaws.com/mybucket/k");
        assert_eq!(info.region.as_deref(), Some("us-west-1"));
    }

    #[test]
    fn region_falls_back_to_configured_default() {
        let (_, info) = rebuilt("s3://mybucket/k", "ap-northeast-1");
        assert_eq!(info.region.as_deref(), Some("ap-northeast-1"));
    }

    #[test]
    fn region_unresolved_without_any_source() {
        let mut info = StorageInfo::new();
        let err = rebuild_locator(&url("s3://mybucket/k"), Some(&mut info), &NoDefaults)
            .unwrap_err();
        assert!(matches!(err, LocatorError::RegionUnresolved { .. }));
    }

    #[test]
    fn bucket_from_host_wins_over_path() {
        let (out, info) = rebuilt("https://mybucket.s3.us-east-1.amazonaws.com/key", "us-east-1");
        assert_eq!(info.bucket.as_deref(), Some("mybucket"));
        assert_eq!(out.path(), "/mybucket/key");
    }

    #[test]
    fn bucket_from_path_wins_over_record() {
        let mut info = StorageInfo {
            bucket: Some("prior".to_string()),
            ..Default::default()
        };
        let out = rebuild_locator(
            &url("https://s3.us-east-1.amazonaws.com/frompath/k"),
            Some(&mut info),
            &NoDefaults,
        )
        .unwrap();
        assert_eq!(info.bucket.as_deref(), Some("frompath"));
        assert_eq!(out.path(), "/frompath/k");
    }

    #[test]
    fn bucket_falls_back_to_record() {
        let mut info = StorageInfo {
            bucket: Some("prior".to_string()),
            ..Default::default()
        };
        let out = rebuild_locator(
            &url("https://s3.us-east-1.amazonaws.com"),
            Some(&mut info),
            &NoDefaults,
        )
        .unwrap();
        assert_eq!(out.as_str(), "https://s3.us-east-1.amazonaws.com/prior");
        assert_eq!(info.bucket.as_deref(), Some("prior"));
    }

    #[test]
    fn bucket_unresolved_without_any_source() {
        let err = rebuild_locator(
            &url("https://s3.us-east-1.amazonaws.com"),
            None,
            &NoDefaults,
        )
        .unwrap_err();
        assert!(matches!(err, LocatorError::BucketUnresolved { .. }));
    }

    #[test]
    fn six_segment_aws_host_is_malformed() {
        let err = rebuild_locator(
            &url("https://a.b.s3.us-east-1.amazonaws.com/k"),
            None,
            &NoDefaults,
        )
        .unwrap_err();
        assert!(matches!(err, LocatorError::MalformedLocator { .. }));
    }

    #[test]
    fn four_segment_aws_host_with_invalid_bucket_is_malformed() {
        let err = rebuild_locator(
            &url("https://x_.s3.amazonaws.com/k"),
            None,
            &NoDefaults,
        )
        .unwrap_err();
        assert!(matches!(err, LocatorError::MalformedLocator { .. }));
    }

    #[test]
    fn five_segment_aws_host_without_s3_marker_is_malformed() {
        let err = rebuild_locator(
            &url("https://mybucket.proxy.us-east-1.amazonaws.com/k"),
            None,
            &NoDefaults,
        )
        .unwrap_err();
        assert!(matches!(err, LocatorError::MalformedLocator { .. }));
    }

    #[test]
    fn missing_host_is_malformed() {
        let err = rebuild_locator(&url("file:///tmp/data.nc"), None, &NoDefaults).unwrap_err();
        assert!(matches!(err, LocatorError::MalformedLocator { .. }));
    }

    #[test]
    fn bucket_tokens() {
        assert!(is_bucket_token("mybucket"));
        assert!(is_bucket_token("my-bucket-01"));
        assert!(!is_bucket_token("x_"));
        assert!(!is_bucket_token("-leading-dash"));
        assert!(!is_bucket_token("ab"));
        assert!(!is_bucket_token("s3")); // matched literally before this check
    }
}
