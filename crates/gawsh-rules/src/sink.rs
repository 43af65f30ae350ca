//! All-or-nothing rule file output.
//!
//! A pass that fails must leave no partial rule file behind, so output is
//! staged and only released by [`RuleSink::commit`]. Dropping an
//! uncommitted sink discards everything written to it.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::RuleResult;

/// Staged destination for a rule file.
pub enum RuleSink {
    /// Temporary file beside `dest`, renamed over it on commit.
    File {
        staging: BufWriter<NamedTempFile>,
        dest: PathBuf,
    },
    /// In-memory buffer copied to `out` on commit.
    Buffered {
        buf: Vec<u8>,
        out: Box<dyn Write + Send>,
    },
}

impl RuleSink {
    /// Stage output for `dest`. The parent directory must exist.
    pub fn to_file(dest: &Path) -> RuleResult<Self> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = NamedTempFile::new_in(dir)?;
        debug!(staging = %staging.path().display(), dest = %dest.display(), "staging rule file");
        Ok(RuleSink::File {
            staging: BufWriter::new(staging),
            dest: dest.to_path_buf(),
        })
    }

    /// Stage output in memory for a stream such as stdout.
    pub fn to_writer(out: Box<dyn Write + Send>) -> Self {
        RuleSink::Buffered {
            buf: Vec::new(),
            out,
        }
    }

    /// Release the staged output to its destination.
    pub fn commit(self) -> RuleResult<()> {
        match self {
            RuleSink::File { staging, dest } => {
                let file = staging.into_inner().map_err(|e| e.into_error())?;
                file.as_file().sync_all()?;
                file.persist(&dest).map_err(|e| e.error)?;
                debug!(dest = %dest.display(), "rule file committed");
            }
            RuleSink::Buffered { buf, mut out } => {
                out.write_all(&buf)?;
                out.flush()?;
            }
        }
        Ok(())
    }
}

impl Write for RuleSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            RuleSink::File { staging, .. } => staging.write(data),
            RuleSink::Buffered { buf, .. } => buf.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RuleSink::File { staging, .. } => staging.flush(),
            // nothing leaves the buffer before commit
            RuleSink::Buffered { .. } => Ok(()),
        }
    }
}

/// Create the directory a rule file will be written into.
pub fn ensure_parent_dir(dest: &Path) -> RuleResult<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
