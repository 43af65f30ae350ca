//! Rule file layout: preamble, blob rules, umbrella.

use std::io::{self, Write};

use crate::rule::{BuildRule, UmbrellaRule};

/// Writes a complete make file one rule at a time.
pub struct RuleFileWriter<W: Write> {
    out: W,
    bytes_written: usize,
}

impl<W: Write> RuleFileWriter<W> {
    /// Start a rule file whose default goal is `umbrella`.
    pub fn begin(mut out: W, umbrella: &str) -> io::Result<Self> {
        let preamble = preamble(umbrella);
        out.write_all(preamble.as_bytes())?;
        Ok(Self {
            out,
            bytes_written: preamble.len(),
        })
    }

    pub fn write_rule(&mut self, rule: &BuildRule) -> io::Result<()> {
        self.write_text(&rule.to_make())
    }

    /// Write the umbrella as the last rule and flush.
    pub fn finish(mut self, umbrella: &UmbrellaRule) -> io::Result<(W, usize)> {
        self.write_text(&umbrella.to_make())?;
        self.out.flush()?;
        Ok((self.out, self.bytes_written))
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.bytes_written += text.len();
        Ok(())
    }
}

/// Header shared by every rule file.
///
/// `.DELETE_ON_ERROR` matters: without it a failed render leaves a
/// truncated `index.html` newer than nothing, and the next run skips it.
fn preamble(umbrella: &str) -> String {
    format!(
        "# Generated by gawsh; overwritten on every run.\n\
         .DEFAULT_GOAL := {umbrella}\n\
         .PHONY: {umbrella}\n\
         .DELETE_ON_ERROR:\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gawsh_types::ContentId;

    #[test]
    fn empty_rule_file() {
        let writer = RuleFileWriter::begin(Vec::new(), "all").unwrap();
        let (out, bytes) = writer.finish(&UmbrellaRule::new("all", "out", &[])).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# Generated by gawsh; overwritten on every run.\n\
             .DEFAULT_GOAL := all\n\
             .PHONY: all\n\
             .DELETE_ON_ERROR:\n\n\
             all:\n"
        );
        assert_eq!(bytes, text.len());
    }

    #[test]
    fn rules_precede_umbrella() {
        let id = ContentId::parse(&"a".repeat(40), 40).unwrap();
        let rule = BuildRule {
            id: id.clone(),
            target: "t".into(),
            directory: "d".into(),
            commands: vec!["true".into()],
        };
        let mut writer = RuleFileWriter::begin(Vec::new(), "site").unwrap();
        writer.write_rule(&rule).unwrap();
        let (out, _) = writer
            .finish(&UmbrellaRule::new("site", "out", &[id]))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let rule_at = text.find("t:\n\ttrue\n").unwrap();
        let umbrella_at = text.find("site: \\\n").unwrap();
        assert!(rule_at < umbrella_at);
        assert!(text.ends_with("/index.html\n"));
    }
}
