//! Dotted key-path codec.
//!
//! A key path is a non-empty sequence of non-empty segments joined with
//! [`C_KEY_PATH_SEPARATOR`]. Segments containing the separator are rejected
//! when a path is built, so `decode(encode(x)) == x` holds for every path
//! this module hands out.

use std::fmt;

use crate::conf::C_KEY_PATH_SEPARATOR;
use crate::spec::KeyPathError;

/// Validated key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SpecKeyPath {
    segments: Vec<String>,
}

impl SpecKeyPath {
    /// Empty path; only useful as the root prefix while descending a tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Decode an encoded path (`a.b.c`).
    pub fn decode(path: &str) -> Result<Self, KeyPathError> {
        Ok(Self {
            segments: decode_key_path(path)?,
        })
    }

    /// Encode as `a.b.c`.
    pub fn encode(&self) -> String {
        encode_key_path(&self.segments)
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, KeyPathError> {
        let segment = segment.into();
        validate_segment(&segment).map_err(|err| match err {
            KeyPathError::SeparatorInSegment { segment, .. } => KeyPathError::SeparatorInSegment {
                path: self.encode(),
                segment,
            },
            KeyPathError::EmptySegment { .. } => KeyPathError::EmptySegment {
                path: self.encode(),
            },
            other => other,
        })?;

        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for SpecKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Join segments with the separator.
pub fn encode_key_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut c_path = String::new();
    for (n_idx, segment) in segments.iter().enumerate() {
        if n_idx > 0 {
            c_path.push(C_KEY_PATH_SEPARATOR);
        }
        c_path.push_str(segment.as_ref());
    }
    c_path
}

/// Split an encoded path on the separator. Any depth is accepted.
pub fn decode_key_path(path: &str) -> Result<Vec<String>, KeyPathError> {
    if path.is_empty() {
        return Err(KeyPathError::EmptyPath);
    }
    let l_segments: Vec<String> = path
        .split(C_KEY_PATH_SEPARATOR)
        .map(ToString::to_string)
        .collect();
    if l_segments.iter().any(String::is_empty) {
        return Err(KeyPathError::EmptySegment {
            path: path.to_string(),
        });
    }
    Ok(l_segments)
}

/// Reject segments that cannot round-trip through encode/decode.
pub fn validate_segment(segment: &str) -> Result<(), KeyPathError> {
    if segment.is_empty() {
        return Err(KeyPathError::EmptySegment {
            path: String::new(),
        });
    }
    if segment.contains(C_KEY_PATH_SEPARATOR) {
        return Err(KeyPathError::SeparatorInSegment {
            path: String::new(),
            segment: segment.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_supports_arbitrary_depth() {
        let path = SpecKeyPath::decode("a.b.c.d.e").unwrap();
        assert_eq!(path.segments().len(), 5);
        assert_eq!(path.segments()[4], "e");
        assert_eq!(path.encode(), "a.b.c.d.e");
    }

    #[test]
    fn decode_rejects_empty_segments() {
        for c_path in ["a..b", ".a", "a."] {
            assert_eq!(
                decode_key_path(c_path),
                Err(KeyPathError::EmptySegment {
                    path: c_path.to_string()
                })
            );
        }
        assert_eq!(decode_key_path(""), Err(KeyPathError::EmptyPath));
    }

    #[test]
    fn child_rejects_separator_and_names_parent() {
        let parent = SpecKeyPath::decode("menu").unwrap();
        let err = parent.child("file.open").unwrap_err();
        assert_eq!(
            err,
            KeyPathError::SeparatorInSegment {
                path: "menu".to_string(),
                segment: "file.open".to_string(),
            }
        );
    }

    #[test]
    fn single_segment_encodes_without_separator() {
        assert_eq!(encode_key_path(&["title"]), "title");
        assert_eq!(
            SpecKeyPath::decode("title").unwrap().to_string(),
            "title"
        );
    }
}
