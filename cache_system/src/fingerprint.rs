//! Cache key derivation
//!
//! Keys are `prefix + hex(md5(canonical JSON of the normalized descriptor))`.
//! MD5 is not collision resistant against an adversary. Keys only need to
//! spread well and stay stable, and switching the digest would orphan every
//! entry already written under the old scheme, so it stays.

use crate::descriptor::RequestDescriptor;
use md5::{Digest, Md5};
use std::fmt;

/// Store key computed from a request descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Compact JSON of the lower-cased, sorted top-level fields
pub fn canonical_json(descriptor: &RequestDescriptor) -> String {
    // BTreeMap serializes in key order regardless of serde_json's map features.
    // Serializing string keys and JSON values cannot fail.
    serde_json::to_string(&descriptor.normalized()).unwrap_or_default()
}

/// Lower-case hex MD5 of the canonical encoding
pub fn content_hash(descriptor: &RequestDescriptor) -> String {
    let digest = Md5::digest(canonical_json(descriptor).as_bytes());
    format!("{:x}", digest)
}

/// Derive the namespaced store key for `descriptor`. Pure and deterministic.
pub fn fingerprint(descriptor: &RequestDescriptor, prefix: &str) -> CacheKey {
    let hash = content_hash(descriptor);
    let mut key = String::with_capacity(prefix.len() + hash.len());
    key.push_str(prefix);
    key.push_str(&hash);
    CacheKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefixed_md5_of_canonical_json() {
        let descriptor = RequestDescriptor::new().with_field("foo", "bar");

        assert_eq!(canonical_json(&descriptor), r#"{"foo":"bar"}"#);
        assert_eq!(
            fingerprint(&descriptor, "cache:").as_str(),
            "cache:9bb58f26192e4ba00f01e2e7b136bbd8"
        );
    }

    #[test]
    fn test_known_request_key() {
        let descriptor = RequestDescriptor::get("https://x.example/y");

        assert_eq!(
            canonical_json(&descriptor),
            r#"{"method":"get","url":"https://x.example/y"}"#
        );
        assert_eq!(
            fingerprint(&descriptor, "cache:").as_str(),
            "cache:af0bbbbfe4e5c84dc31ecb2f0044317e"
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a = RequestDescriptor::new()
            .with_field("foo", "bar")
            .with_field("baz", "qux");
        let b = RequestDescriptor::new()
            .with_field("baz", "qux")
            .with_field("foo", "bar");

        assert_eq!(fingerprint(&a, "cache:"), fingerprint(&b, "cache:"));
    }

    #[test]
    fn test_field_case_does_not_matter() {
        let a = RequestDescriptor::new()
            .with_field("Method", "get")
            .with_field("URL", "https://x.example/y");
        let b = RequestDescriptor::get("https://x.example/y");

        assert_eq!(fingerprint(&a, "cache:"), fingerprint(&b, "cache:"));
    }

    #[test]
    fn test_stable_across_calls() {
        let descriptor = RequestDescriptor::get("https://x.example/y")
            .with_header("accept", "text/html")
            .with_json(json!({"b": 1, "a": [1, 2, 3]}));

        let first = fingerprint(&descriptor, "cache:");
        let second = fingerprint(&descriptor, "cache:");
        assert_eq!(first, second);
    }

    #[test]
    fn test_value_and_prefix_change_the_key() {
        let base = RequestDescriptor::get("https://x.example/y");
        let other = RequestDescriptor::get("https://x.example/z");
        let overridden = RequestDescriptor::get("https://x.example/y").with_ttl(60);

        assert_ne!(fingerprint(&base, "cache:"), fingerprint(&other, "cache:"));
        assert_ne!(fingerprint(&base, "cache:"), fingerprint(&overridden, "cache:"));

        let request_key = fingerprint(&base, "request:");
        assert!(request_key.as_str().starts_with("request:"));
        assert_eq!(
            request_key.as_str().trim_start_matches("request:"),
            fingerprint(&base, "cache:").as_str().trim_start_matches("cache:")
        );
    }

    #[test]
    fn test_values_are_not_normalized() {
        let lower = RequestDescriptor::get("https://x.example/y");
        let upper = RequestDescriptor::new()
            .with_method("GET")
            .with_url("https://x.example/y");

        assert_ne!(fingerprint(&lower, "cache:"), fingerprint(&upper, "cache:"));
    }
}
