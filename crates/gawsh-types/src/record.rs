use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::object::ContentId;

/// A blob identifier together with the name it is displayed under.
///
/// The filename is a bare base name, never a path: the same content may
/// live under many paths across history and only the leaf of the first one
/// seen is kept. It is a rendering hint (syntax is usually guessed from the
/// extension), not part of the blob's identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ContentId,
    pub filename: String,
}

impl ObjectRecord {
    pub fn new(id: ContentId, filename: impl Into<String>) -> Result<Self, TypeError> {
        let filename = filename.into();
        if filename.is_empty() {
            return Err(TypeError::EmptyFilename);
        }
        Ok(Self { id, filename })
    }

    /// Extension of the display filename, without the dot.
    ///
    /// Dotfiles such as `.gitignore` have no extension.
    pub fn extension(&self) -> Option<&str> {
        match self.filename.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&self.filename[idx + 1..]).filter(|ext| !ext.is_empty()),
        }
    }
}
