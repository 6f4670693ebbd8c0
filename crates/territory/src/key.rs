//! Hierarchical domain keys.
//!
//! A key is a colon-delimited path such as `no:ak:os`. The first segment names
//! a root domain; every further segment names a subdomain of the key before
//! it. Keys are immutable and compared structurally.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::KEY_SEPARATOR;

/// Identifier of a domain: a non-empty sequence of non-empty path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    segments: Vec<String>,
}

/// Rejected key syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedKey {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for MalformedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed domain key {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for MalformedKey {}

fn validate_segment(input: &str, segment: &str) -> Result<(), MalformedKey> {
    if segment.is_empty() {
        return Err(MalformedKey {
            input: input.to_string(),
            reason: "empty path segment",
        });
    }
    if segment
        .chars()
        .any(|c| c == KEY_SEPARATOR || c.is_whitespace() || c.is_control())
    {
        return Err(MalformedKey {
            input: input.to_string(),
            reason: "segment contains a separator, whitespace or control character",
        });
    }
    Ok(())
}

impl Key {
    pub fn parse(text: &str) -> Result<Self, MalformedKey> {
        let mut segments = Vec::new();
        for segment in text.split(KEY_SEPARATOR) {
            validate_segment(text, segment)?;
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// The key with its last segment removed; `None` for a root key.
    pub fn super_key(&self) -> Option<Key> {
        if self.is_root() {
            return None;
        }
        Some(Key {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The key of a direct subdomain named `segment`.
    pub fn sub_key(&self, segment: &str) -> Result<Key, MalformedKey> {
        validate_segment(segment, segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Key { segments })
    }

    /// Lowest common ancestor of two keys.
    ///
    /// - The common key of `no:ak:os` and `no:ak:ls` is `no:ak`.
    /// - The common key of `no:ak` and `ch` is `None`: different root trees.
    pub fn common_ancestor(a: &Key, b: &Key) -> Option<Key> {
        let shared = a
            .segments
            .iter()
            .zip(&b.segments)
            .take_while(|(x, y)| x == y)
            .count();
        if shared == 0 {
            return None;
        }
        Some(Key {
            segments: a.segments[..shared].to_vec(),
        })
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Key) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, segment) in self.segments.iter().enumerate() {
            if n > 0 {
                write!(f, "{KEY_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for Key {
    type Err = MalformedKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s)
    }
}

impl TryFrom<String> for Key {
    type Error = MalformedKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Key::parse(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> Key {
        Key::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let k = key("no:ak:os");
        assert_eq!(k.segments(), ["no", "ak", "os"]);
        assert_eq!(k.to_string(), "no:ak:os");
        assert_eq!(k.depth(), 3);
    }

    #[test]
    fn test_rejects_malformed_syntax() {
        for bad in ["", ":", "no:", ":no", "no::ak", "no ak", "no:\tak", "no:a\u{7}"] {
            let err = Key::parse(bad).unwrap_err();
            assert_eq!(err.input, bad);
        }
    }

    #[test]
    fn test_accepts_any_other_characters() {
        for good in ["no:ä", "日本:東京", "no:ak-1", "no:ak_os", "a.b:c/d"] {
            assert_eq!(key(good).to_string(), good);
        }
        assert_eq!(key("no").sub_key("øst").unwrap(), key("no:øst"));
        assert!(key("no").sub_key("ø st").is_err());
    }

    #[test]
    fn test_super_key() {
        assert_eq!(key("no:ak:os").super_key(), Some(key("no:ak")));
        assert_eq!(key("no").super_key(), None);
    }

    #[test]
    fn test_sub_key() {
        assert_eq!(key("no").sub_key("ak").unwrap(), key("no:ak"));
        assert!(key("no").sub_key("a:b").is_err());
        assert!(key("no").sub_key("").is_err());
    }

    #[test]
    fn test_common_ancestor_examples() {
        assert_eq!(
            Key::common_ancestor(&key("no:ak:os"), &key("no:ak:ls")),
            Some(key("no:ak"))
        );
        assert_eq!(Key::common_ancestor(&key("no:ak"), &key("ch")), None);
    }

    #[test]
    fn test_common_ancestor_is_longest_shared_prefix() {
        let a = key("no:ak:os:x");
        let b = key("no:ak:os");
        let common = Key::common_ancestor(&a, &b).unwrap();
        assert_eq!(common, b);
        assert_eq!(Key::common_ancestor(&b, &a), Some(b.clone()));
        assert_eq!(Key::common_ancestor(&a, &a), Some(a.clone()));
        // Diverging after the root keeps only the root.
        assert_eq!(
            Key::common_ancestor(&key("no:ak"), &key("no:tr")),
            Some(key("no"))
        );
    }

    #[test]
    fn test_is_ancestor_of() {
        assert!(key("no").is_ancestor_of(&key("no:ak")));
        assert!(!key("no:ak").is_ancestor_of(&key("no:ak")));
        assert!(!key("no:ak").is_ancestor_of(&key("no")));
        assert!(!key("no:a").is_ancestor_of(&key("no:ak")));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let k = key("no:ak");
        let json = serde_json::to_string(&k).unwrap();
        assert_eq!(json, "\"no:ak\"");
        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);
        assert!(serde_json::from_str::<Key>("\"no::ak\"").is_err());
    }
}
