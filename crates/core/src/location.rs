//! Location parsing and resolution
//!
//! Handles parsing of storage locations in the format: s3://bucket[/key]

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Scheme recognized as pointing at object storage
pub const STORAGE_SCHEME: &str = "s3";

/// What to report when a location uses a scheme other than [`STORAGE_SCHEME`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicy {
    /// Fail with the distinct [`Error::UnsupportedScheme`]
    #[default]
    Reject,
    /// Fail with the generic [`Error::Io`], like every other failure
    Io,
}

/// A parsed location pointing at an object in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageLocation {
    /// URI scheme, lowercased by the parser
    pub scheme: String,
    /// Bucket name (the URI authority)
    pub bucket: String,
    /// Object key; empty or "/" when the location names the bucket root
    pub key: String,
}

impl StorageLocation {
    /// Build a location from the raw input and its parsed URI
    ///
    /// The scheme is not checked here; see [`resolve_location`]. The key is
    /// taken from `input` rather than `url`, whose path has already had dot
    /// segments removed.
    fn from_parts(input: &str, url: &Url) -> Result<Self> {
        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(Error::invalid_location(format!(
                    "'{input}' does not name a bucket"
                )));
            }
        };

        let raw = raw_path(input).ok_or_else(|| {
            Error::invalid_location(format!("'{input}' does not name a bucket"))
        })?;
        let path = urlencoding::decode(raw).map_err(|e| {
            Error::invalid_location(format!("'{input}' has a path that is not valid UTF-8: {e}"))
        })?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            bucket,
            key: key_from_path(&path),
        })
    }

    /// Whether this location uses the storage scheme
    pub fn is_storage_scheme(&self) -> bool {
        self.scheme.eq_ignore_ascii_case(STORAGE_SCHEME)
    }

    /// Get the location back as a URI string
    pub fn to_uri(&self) -> String {
        if self.key.is_empty() || self.key == "/" {
            format!("{}://{}{}", self.scheme, self.bucket, self.key)
        } else {
            format!("{}://{}/{}", self.scheme, self.bucket, self.key)
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}

/// The path component of `input` exactly as written
///
/// Runs from the end of the authority to the first `?` or `#`. `None` when
/// there is no authority.
fn raw_path(input: &str) -> Option<&str> {
    let (_, rest) = input.split_once(':')?;
    let rest = rest.strip_prefix("//")?;
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let hier = &rest[..end];
    Some(hier.find('/').map_or("", |start| &hier[start..]))
}

/// Characters allowed unescaped anywhere in a URI (RFC 3986 unreserved,
/// gen-delims and sub-delims)
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=".contains(c)
}

/// Reject input the URL parser would otherwise quietly repair
///
/// Every character must be allowed by RFC 3986 (non-ASCII letters are let
/// through, as most URI implementations do), every `%` must start a two
/// digit hex escape, brackets may only appear in the authority and there is
/// at most one `#`.
fn check_syntax(input: &str) -> Result<()> {
    let invalid = |what: String| -> Result<()> {
        Err(Error::invalid_location(format!(
            "unable to parse '{input}': {what}"
        )))
    };

    let mut chars = input.char_indices();
    while let Some((at, c)) = chars.next() {
        if c == '%' {
            let escape: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
            if escape.len() != 2 || !escape.chars().all(|c| c.is_ascii_hexdigit()) {
                return invalid(format!("malformed escape at index {at}"));
            }
        } else if c.is_whitespace() || c.is_control() {
            return invalid(format!("illegal whitespace at index {at}"));
        } else if c.is_ascii() && !is_uri_char(c) {
            return invalid(format!("illegal character '{c}' at index {at}"));
        }
    }

    if input.matches('#').count() > 1 {
        return invalid("more than one fragment separator".to_string());
    }
    let tail = input.split_once(['?', '#']).map_or("", |(_, tail)| tail);
    if raw_path(input).is_some_and(|path| path.contains(['[', ']'])) || tail.contains(['[', ']']) {
        return invalid("brackets outside the authority".to_string());
    }

    Ok(())
}

/// Derive the object key from a decoded URI path
///
/// A path longer than one character loses exactly its leading separator.
/// Anything shorter ("" or "/") is kept as is.
fn key_from_path(path: &str) -> String {
    let mut chars = path.chars();
    if path.chars().count() > 1 {
        chars.next();
        chars.as_str().to_string()
    } else {
        path.to_string()
    }
}

/// Parse a location string into a URI
///
/// Rejects missing, blank, and syntactically invalid input.
pub fn parse_uri(path: Option<&str>) -> Result<Url> {
    let path = match path {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(Error::invalid_location("location was unspecified or empty")),
    };

    check_syntax(path)?;

    Url::parse(path).map_err(|e| Error::InvalidLocation {
        reason: format!("unable to parse '{path}'"),
        source: Some(e),
    })
}

/// Parse and validate a location string
///
/// The scheme is compared case-insensitively against [`STORAGE_SCHEME`]
/// before bucket and key are derived. A mismatch is reported according to
/// `policy`.
pub fn resolve_location(path: Option<&str>, policy: SchemePolicy) -> Result<StorageLocation> {
    let url = parse_uri(path)?;

    if !url.scheme().eq_ignore_ascii_case(STORAGE_SCHEME) {
        return Err(match policy {
            SchemePolicy::Reject => Error::UnsupportedScheme(url.scheme().to_string()),
            SchemePolicy::Io => Error::Io(format!(
                "Configuration location uses unsupported scheme: {}",
                url.scheme()
            )),
        });
    }

    StorageLocation::from_parts(path.unwrap_or_default(), &url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(path: &str) -> Result<StorageLocation> {
        resolve_location(Some(path), SchemePolicy::Reject)
    }

    #[test]
    fn test_resolve_bucket_and_key() {
        let loc = resolve("s3://bucket/key").unwrap();
        assert_eq!(loc.scheme, "s3");
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "key");
    }

    #[test]
    fn test_resolve_nested_key() {
        let loc = resolve("s3://bucket/a/b/c").unwrap();
        assert_eq!(loc.key, "a/b/c");
    }

    #[test]
    fn test_only_one_separator_stripped() {
        let loc = resolve("s3://bucket//a").unwrap();
        assert_eq!(loc.key, "/a");
    }

    #[test]
    fn test_resolve_bucket_root() {
        let loc = resolve("s3://bucket").unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "");

        let loc = resolve("s3://bucket/").unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "/");
    }

    #[test]
    fn test_trailing_separator_kept() {
        let loc = resolve("s3://bucket/dir/").unwrap();
        assert_eq!(loc.key, "dir/");
    }

    #[test]
    fn test_scheme_case_insensitive() {
        let loc = resolve("S3://cfg-bucket/config.yml").unwrap();
        assert!(loc.is_storage_scheme());
        assert_eq!(loc.key, "config.yml");
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        let loc = resolve("s3://bucket/app.yml?versionId=3#top").unwrap();
        assert_eq!(loc.key, "app.yml");
    }

    #[test]
    fn test_percent_encoded_key_decoded() {
        let loc = resolve("s3://bucket/my%20config.yml").unwrap();
        assert_eq!(loc.key, "my config.yml");
    }

    #[test]
    fn test_empty_and_blank_rejected() {
        for input in [None, Some(""), Some("   "), Some("\t\n")] {
            let err = resolve_location(input, SchemePolicy::Reject).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLocation { source: None, .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_unparseable_rejected_with_cause() {
        let err = resolve("not a uri").unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));

        let err = resolve("bucket/key").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLocation {
                source: Some(url::ParseError::RelativeUrlWithoutBase),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_bucket_rejected() {
        let err = resolve("s3:bucket/key").unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }

    #[test]
    fn test_unsupported_scheme_reject_policy() {
        let err = resolve("http://bucket/key").unwrap_err();
        match err {
            Error::UnsupportedScheme(scheme) => assert_eq!(scheme, "http"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_scheme_io_policy() {
        let err = resolve_location(Some("http://bucket/key"), SchemePolicy::Io).unwrap_err();
        match err {
            Error::Io(message) => assert!(message.contains("http")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_scheme_checked_before_authority() {
        let err = resolve("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme(_)));
    }

    #[test]
    fn test_dot_segments_kept_in_key() {
        assert_eq!(resolve("s3://bucket/a/../b").unwrap().key, "a/../b");
        assert_eq!(resolve("s3://bucket/./a.yml").unwrap().key, "./a.yml");
        assert_eq!(resolve("s3://bucket/..").unwrap().key, "..");
        assert_eq!(
            resolve("s3://bucket/app/../secret.yml").unwrap().key,
            "app/../secret.yml"
        );
    }

    #[test]
    fn test_encoded_dot_segments_decoded_not_removed() {
        assert_eq!(resolve("s3://bucket/a/%2e%2e/b").unwrap().key, "a/../b");
    }

    #[test]
    fn test_key_stops_at_query_and_fragment() {
        assert_eq!(resolve("s3://bucket?x=1").unwrap().key, "");
        assert_eq!(resolve("s3://bucket/#frag").unwrap().key, "/");
        assert_eq!(resolve("s3://bucket/../a?b#c").unwrap().key, "../a");
    }

    #[test]
    fn test_illegal_characters_rejected() {
        for input in [
            "s3://bucket/a|b",
            "s3://bucket/a{b}",
            "s3://bucket/a\"b",
            "s3://bucket/a^b",
            "s3://bucket/a`b",
            "s3://bucket/<a>",
            "s3://bucket/a\\b",
            "s3://bucket/a[0]",
            "s3://bucket/a#b#c",
        ] {
            let err = resolve(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLocation { source: None, .. }),
                "{input} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_malformed_escapes_rejected() {
        for input in ["s3://bucket/%zz", "s3://bucket/a%2", "s3://bucket/a%"] {
            let err = resolve(input).unwrap_err();
            assert!(matches!(err, Error::InvalidLocation { .. }), "{input} gave {err:?}");
        }
    }

    #[test]
    fn test_non_ascii_key_allowed() {
        assert_eq!(resolve("s3://bucket/café.yml").unwrap().key, "café.yml");
        assert_eq!(resolve("s3://bucket/caf%C3%A9.yml").unwrap().key, "café.yml");
    }

    #[test]
    fn test_location_display() {
        let loc = resolve("s3://bucket/a/b.yml").unwrap();
        assert_eq!(loc.to_string(), "s3://bucket/a/b.yml");

        let loc = resolve("s3://bucket/").unwrap();
        assert_eq!(loc.to_string(), "s3://bucket/");

        let loc = resolve("s3://bucket").unwrap();
        assert_eq!(loc.to_string(), "s3://bucket");
    }
}
