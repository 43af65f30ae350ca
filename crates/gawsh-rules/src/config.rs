use std::path::Path;

use gawsh_types::DEFAULT_OID_LENGTH;
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};

/// Characters allowed in paths and target names that are written into the
/// rule file unquoted.
const PLAIN_TOKEN_PUNCTUATION: &[char] = &['/', '.', '_', '-', '+', ',', '@', '~'];

/// Configuration for one generation pass.
///
/// Every field has a default, so a TOML file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Hex characters in a content identifier (40 for SHA-1, 64 for SHA-256).
    pub oid_length: usize,
    /// Directory the rendered tree is written under.
    pub output_root: String,
    /// Longest display filename accepted, in bytes.
    pub max_filename_len: usize,
    /// Longest single rule accepted, in bytes.
    pub max_rule_len: usize,
    /// Shell command that prints a blob's raw bytes; the identifier is
    /// appended as the last argument.
    pub fetch_command: String,
    /// Shell command that turns blob bytes on stdin into HTML on stdout; the
    /// quoted display filename is appended as the last argument.
    pub render_command: String,
    /// Name of the rule that depends on every rendered blob.
    pub umbrella_target: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            oid_length: DEFAULT_OID_LENGTH,
            output_root: ".gawsh-output".into(),
            max_filename_len: 255,
            max_rule_len: 8192,
            fetch_command: "git cat-file blob".into(),
            render_command: "gawsh render --filename".into(),
            umbrella_target: "all".into(),
        }
    }
}

impl GenerateConfig {
    /// Parse a TOML document, filling unspecified fields with defaults.
    pub fn from_toml_str(s: &str) -> RuleResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| RuleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> RuleResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the configuration can produce a well-formed rule file.
    pub fn validate(&self) -> RuleResult<()> {
        if self.oid_length == 0 {
            return Err(RuleError::Config("oid_length must be at least 1".into()));
        }
        if self.max_filename_len == 0 {
            return Err(RuleError::Config(
                "max_filename_len must be at least 1".into(),
            ));
        }
        check_plain_token("output_root", &self.output_root)?;
        check_plain_token("umbrella_target", &self.umbrella_target)?;
        if self.fetch_command.trim().is_empty() {
            return Err(RuleError::Config("fetch_command must not be empty".into()));
        }
        if self.render_command.trim().is_empty() {
            return Err(RuleError::Config("render_command must not be empty".into()));
        }
        if let Some(c) = self
            .fetch_command
            .chars()
            .chain(self.render_command.chars())
            .find(|c| c.is_control())
        {
            return Err(RuleError::Config(format!(
                "commands must not contain control character {c:?}"
            )));
        }
        Ok(())
    }
}

/// A token written verbatim as a make target and a shell word.
fn check_plain_token(field: &str, value: &str) -> RuleResult<()> {
    if value.is_empty() {
        return Err(RuleError::Config(format!("{field} must not be empty")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !PLAIN_TOKEN_PUNCTUATION.contains(c))
    {
        return Err(RuleError::Config(format!(
            "{field} {value:?} contains unsupported character {c:?}"
        )));
    }
    Ok(())
}
