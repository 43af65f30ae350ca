//! Streaming deduplication of listing lines by content identifier.

use std::collections::HashMap;

use gawsh_types::{ContentId, ObjectRecord};
use tracing::{debug, warn};

use crate::error::{MalformedReason, RuleError, RuleResult};
use crate::parser::parse_record;

/// What is remembered about a blob after its first sighting.
#[derive(Debug)]
struct SeenBlob {
    /// Extension of the first filename; it picks the highlighting syntax.
    extension: Option<String>,
    conflict_reported: bool,
}

/// Folds listing lines into unique records, first sighting wins.
///
/// Lines are fed one at a time, so the listing never has to be resident in
/// memory; only the set of identifiers seen so far is kept. Identifiers are
/// also remembered in first-seen order for the umbrella rule.
#[derive(Debug)]
pub struct Deduplicator {
    oid_length: usize,
    seen: HashMap<ContentId, SeenBlob>,
    order: Vec<ContentId>,
    lines_read: usize,
    duplicates_dropped: usize,
}

impl Deduplicator {
    pub fn new(oid_length: usize) -> Self {
        Self {
            oid_length,
            seen: HashMap::new(),
            order: Vec::new(),
            lines_read: 0,
            duplicates_dropped: 0,
        }
    }

    /// Feed one raw line (newline already stripped).
    ///
    /// Returns the record if its identifier has not been seen before, `None`
    /// for a duplicate. Any malformed line is an error; callers must treat
    /// it as the end of the pass.
    pub fn observe_bytes(&mut self, raw: &[u8]) -> RuleResult<Option<ObjectRecord>> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.observe(line),
            Err(_) => {
                self.lines_read += 1;
                Err(RuleError::MalformedRecord {
                    line: self.lines_read,
                    content: String::from_utf8_lossy(raw).into_owned(),
                    reason: MalformedReason::NotUtf8,
                })
            }
        }
    }

    /// Feed one line (newline already stripped).
    pub fn observe(&mut self, line: &str) -> RuleResult<Option<ObjectRecord>> {
        self.lines_read += 1;
        let record =
            parse_record(line, self.oid_length).map_err(|reason| RuleError::MalformedRecord {
                line: self.lines_read,
                content: line.to_owned(),
                reason,
            })?;

        if let Some(seen) = self.seen.get_mut(&record.id) {
            self.duplicates_dropped += 1;
            let extension = record.extension();
            if !seen.conflict_reported && seen.extension.as_deref() != extension {
                seen.conflict_reported = true;
                warn!(
                    oid = %record.id.short_hex(),
                    first = seen.extension.as_deref().unwrap_or(""),
                    other = extension.unwrap_or(""),
                    "blob seen with multiple extensions; highlighting uses the first"
                );
            }
            return Ok(None);
        }

        debug!(oid = %record.id.short_hex(), name = %record.filename, "new blob");
        self.seen.insert(
            record.id.clone(),
            SeenBlob {
                extension: record.extension().map(str::to_owned),
                conflict_reported: false,
            },
        );
        self.order.push(record.id.clone());
        Ok(Some(record))
    }

    /// Unique identifiers in first-seen order.
    pub fn unique_ids(&self) -> &[ContentId] {
        &self.order
    }

    /// Lines fed so far, including duplicates.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Number of distinct identifiers seen.
    pub fn unique_count(&self) -> usize {
        self.order.len()
    }

    /// Lines dropped because their identifier was already seen.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}
