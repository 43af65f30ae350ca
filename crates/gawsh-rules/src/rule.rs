//! Build rules and their make-syntax rendering.
//!
//! A [`BuildRule`] renders one blob; the [`UmbrellaRule`] depends on every
//! blob rule. Synthesis is pure text formatting: nothing here touches the
//! filesystem or spawns a process.

use gawsh_types::{ContentId, ObjectRecord};

use crate::config::GenerateConfig;
use crate::error::{RuleError, RuleResult};

/// Directory under the output root holding one subdirectory per blob.
pub const OIDS_DIR: &str = "oids";

/// File name of a rendered blob inside its directory.
pub const INDEX_FILE: &str = "index.html";

/// Suffix of the scratch file holding the raw blob while it renders.
const RAW_SUFFIX: &str = ".raw";

/// Directory a blob is rendered into: `<output-root>/oids/<id>`.
pub fn target_dir(output_root: &str, id: &ContentId) -> String {
    let root = output_root.trim_end_matches('/');
    format!("{root}/{OIDS_DIR}/{id}")
}

/// Rendered file for a blob: `<output-root>/oids/<id>/index.html`.
///
/// Depends on the identifier alone, never on the filename, so every
/// sighting of the same blob maps to the same target.
pub fn target_path(output_root: &str, id: &ContentId) -> String {
    format!("{}/{INDEX_FILE}", target_dir(output_root, id))
}

/// One make rule rendering one blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildRule {
    pub id: ContentId,
    pub target: String,
    pub directory: String,
    /// Recipe lines, in execution order.
    pub commands: Vec<String>,
}

impl BuildRule {
    /// Make syntax: `target:` followed by tab-indented recipe lines.
    pub fn to_make(&self) -> String {
        let mut out = String::with_capacity(
            self.target.len() + 2 + self.commands.iter().map(|c| c.len() + 2).sum::<usize>(),
        );
        out.push_str(&self.target);
        out.push_str(":\n");
        for command in &self.commands {
            out.push('\t');
            out.push_str(command);
            out.push('\n');
        }
        out
    }
}

/// The rule with no recipe that depends on every blob target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UmbrellaRule {
    pub name: String,
    pub prerequisites: Vec<String>,
}

impl UmbrellaRule {
    /// Umbrella over the given blobs, in the given order.
    pub fn new(name: impl Into<String>, output_root: &str, ids: &[ContentId]) -> Self {
        Self {
            name: name.into(),
            prerequisites: ids.iter().map(|id| target_path(output_root, id)).collect(),
        }
    }

    /// Make syntax, one prerequisite per continuation line.
    pub fn to_make(&self) -> String {
        let mut out = format!("{}:", self.name);
        for prerequisite in &self.prerequisites {
            out.push_str(" \\\n  ");
            out.push_str(prerequisite);
        }
        out.push('\n');
        out
    }
}

/// Turns unique records into blob rules.
pub struct RuleSynthesizer<'a> {
    config: &'a GenerateConfig,
}

impl<'a> RuleSynthesizer<'a> {
    pub fn new(config: &'a GenerateConfig) -> Self {
        Self { config }
    }

    /// Build the rule rendering `record`.
    ///
    /// Fails with [`RuleError::CapacityExceeded`] when the filename or the
    /// finished rule is over its configured limit, and with
    /// [`RuleError::UnsafeFilename`] when the filename holds a character
    /// that cannot be quoted into a recipe line.
    pub fn synthesize(&self, record: &ObjectRecord) -> RuleResult<BuildRule> {
        check_filename(&record.filename, self.config.max_filename_len)?;

        let directory = target_dir(&self.config.output_root, &record.id);
        let target = target_path(&self.config.output_root, &record.id);
        let raw = format!("{target}{RAW_SUFFIX}");
        let hint = escape_recipe(&shell_quote(&record.filename));

        let rule = BuildRule {
            id: record.id.clone(),
            commands: vec![
                format!("mkdir -p {directory}"),
                format!("{} {} > {raw}", self.config.fetch_command, record.id),
                format!("{} {hint} < {raw} > {target}", self.config.render_command),
                format!("rm -f {raw}"),
            ],
            target,
            directory,
        };

        let size = rule.to_make().len();
        if size > self.config.max_rule_len {
            return Err(RuleError::CapacityExceeded {
                line: 0,
                what: "rule",
                limit: self.config.max_rule_len,
                actual: size,
            });
        }
        Ok(rule)
    }
}

/// Reject filenames that cannot be carried safely in a recipe line.
///
/// Control characters are refused outright: a newline or carriage return
/// would end the recipe line, and NUL or tab cannot survive the round trip
/// through make and the shell intact.
pub fn check_filename(name: &str, max_len: usize) -> RuleResult<()> {
    if name.len() > max_len {
        return Err(RuleError::CapacityExceeded {
            line: 0,
            what: "filename",
            limit: max_len,
            actual: name.len(),
        });
    }
    if let Some(c) = name.chars().find(|c| c.is_control()) {
        return Err(RuleError::UnsafeFilename {
            line: 0,
            name: name.to_owned(),
            reason: format!("contains control character {c:?}"),
        });
    }
    Ok(())
}

/// Quote `s` as a single POSIX shell word.
pub fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Escape text for a recipe line: make expands `$` even inside shell quotes.
pub fn escape_recipe(s: &str) -> String {
    s.replace('$', "$$")
}
