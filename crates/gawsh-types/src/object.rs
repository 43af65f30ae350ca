use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length of a SHA-1 object name in hex, as git prints it.
pub const DEFAULT_OID_LENGTH: usize = 40;

/// Characters kept by [`ContentId::short_hex`]. Matches sr.ht, one longer
/// than GitHub and GitLab.
const SHORT_HEX_LENGTH: usize = 8;

/// Content-addressed identifier for a blob.
///
/// A `ContentId` is the hex object name git assigns to a blob. It names the
/// content, not a path or a commit: identical bytes anywhere in history share
/// one `ContentId`, which is what lets gawsh render each blob exactly once.
///
/// Hex digits are folded to lowercase on parse, so `ABC…` and `abc…` name
/// the same blob and the same output directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Parse a hex identifier of exactly `expected_len` characters, in
    /// either case.
    pub fn parse(s: &str, expected_len: usize) -> Result<Self, TypeError> {
        if s.len() != expected_len {
            return Err(TypeError::InvalidLength {
                expected: expected_len,
                actual: s.len(),
            });
        }
        if let Some((offset, found)) = s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHex { offset, found });
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// The full hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of hex characters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a parsed identifier; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short hex representation (first 8 characters) for log lines.
    pub fn short_hex(&self) -> &str {
        let end = self.0.len().min(SHORT_HEX_LENGTH);
        &self.0[..end]
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short_hex())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
