//! End-to-end generation pass: listing in, rule file out.

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::Deduplicator;
use crate::config::GenerateConfig;
use crate::error::RuleResult;
use crate::rule::{RuleSynthesizer, UmbrellaRule};
use crate::rulefile::RuleFileWriter;
use crate::sink::RuleSink;

/// Counters from one generation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub lines_read: usize,
    pub unique_blobs: usize,
    pub duplicates_dropped: usize,
    pub rule_bytes: usize,
}

/// Stream `input` through the parser, deduplicator and synthesizer into
/// `out`, ending with the umbrella rule.
///
/// Each line is fully handled before the next is read. The first bad line
/// stops the pass; whatever was already written to `out` is then
/// incomplete, so callers that care use [`generate_into`].
pub fn generate<R: BufRead, W: Write>(
    input: R,
    out: W,
    config: &GenerateConfig,
) -> RuleResult<(W, GenerateReport)> {
    config.validate()?;

    let synthesizer = RuleSynthesizer::new(config);
    let mut dedup = Deduplicator::new(config.oid_length);
    let mut writer = RuleFileWriter::begin(out, &config.umbrella_target)?;

    for raw in input.split(b'\n') {
        let raw = raw?;
        let Some(record) = dedup.observe_bytes(&raw)? else {
            continue;
        };
        let rule = synthesizer
            .synthesize(&record)
            .map_err(|e| e.at_line(dedup.lines_read()))?;
        writer.write_rule(&rule)?;
    }

    let umbrella = UmbrellaRule::new(
        config.umbrella_target.as_str(),
        &config.output_root,
        dedup.unique_ids(),
    );
    let (out, rule_bytes) = writer.finish(&umbrella)?;

    let report = GenerateReport {
        lines_read: dedup.lines_read(),
        unique_blobs: dedup.unique_count(),
        duplicates_dropped: dedup.duplicates_dropped(),
        rule_bytes,
    };
    info!(
        lines = report.lines_read,
        blobs = report.unique_blobs,
        duplicates = report.duplicates_dropped,
        "rule generation complete"
    );
    Ok((out, report))
}

/// Run a pass into a staged sink, committing it only on success.
pub fn generate_into<R: BufRead>(
    input: R,
    sink: RuleSink,
    config: &GenerateConfig,
) -> RuleResult<GenerateReport> {
    let (sink, report) = generate(input, sink, config)?;
    sink.commit()?;
    debug!(bytes = report.rule_bytes, "rule output released");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use std::fs;
    use std::io::{self, Cursor};
    use std::sync::{Arc, Mutex};

    /// Stand-in for stdout that the test can read back after the sink is gone.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run(input: &str, config: &GenerateConfig) -> RuleResult<(String, GenerateReport)> {
        let (out, report) = generate(Cursor::new(input.as_bytes()), Vec::new(), config)?;
        Ok((String::from_utf8(out).unwrap(), report))
    }

    #[test]
    fn end_to_end_dedup() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let input = format!("{a} path/to/foo.c\n{a} other/foo.c\n{b} bar.py\n");
        let config = GenerateConfig {
            output_root: "out".into(),
            ..Default::default()
        };

        let (text, report) = run(&input, &config).unwrap();

        assert_eq!(text.matches("\tmkdir -p").count(), 2);
        assert!(text.contains(&format!("out/oids/{a}/index.html:\n")));
        assert!(text.contains(&format!("out/oids/{b}/index.html:\n")));
        assert!(text.contains("--filename 'foo.c' <"));
        assert!(text.contains("--filename 'bar.py' <"));
        assert!(text.ends_with(&format!(
            "all: \\\n  out/oids/{a}/index.html \\\n  out/oids/{b}/index.html\n"
        )));
        assert_eq!(
            report,
            GenerateReport {
                lines_read: 3,
                unique_blobs: 2,
                duplicates_dropped: 1,
                rule_bytes: text.len(),
            }
        );
    }

    #[test]
    fn missing_trailing_newline_is_fine() {
        let a = "a".repeat(40);
        let (_, report) = run(&format!("{a} x.rs"), &GenerateConfig::default()).unwrap();
        assert_eq!(report.unique_blobs, 1);
    }

    #[test]
    fn empty_listing_yields_empty_umbrella() {
        let (text, report) = run("", &GenerateConfig::default()).unwrap();
        assert!(text.ends_with("all:\n"));
        assert_eq!(report.unique_blobs, 0);
    }

    #[test]
    fn duplicate_rules_are_byte_identical_regardless_of_name() {
        let a = "a".repeat(40);
        let config = GenerateConfig::default();
        let (first, _) = run(&format!("{a} one/x.c\n"), &config).unwrap();
        let (second, _) = run(&format!("{a} two/x.c\n"), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_line_is_malformed() {
        let a = "a".repeat(40);
        let err = run(&format!("{a} x.c\n\n{a} y.c\n"), &GenerateConfig::default()).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn unsafe_filename_reports_line() {
        let a = "a".repeat(40);
        let b = "b".repeat(40);
        let err = run(
            &format!("{a} x.c\n{b} dos.c\r\n"),
            &GenerateConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::UnsafeFilename { line: 2, .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn unsafe_duplicate_is_never_synthesized() {
        // only the first sighting is rendered, so a later bad name is harmless
        let a = "a".repeat(40);
        let (text, _) = run(
            &format!("{a} x.c\n{a} bad\rname\n"),
            &GenerateConfig::default(),
        )
        .unwrap();
        assert!(!text.contains('\r'));
    }

    #[test]
    fn invalid_config_rejected_before_reading() {
        let config = GenerateConfig {
            umbrella_target: "two words".into(),
            ..Default::default()
        };
        assert!(matches!(run("", &config), Err(RuleError::Config(_))));
    }

    #[test]
    fn malformed_input_leaves_previous_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("gawsh.mk");
        fs::write(&dest, "previous run\n").unwrap();

        let a = "a".repeat(40);
        let input = format!("{a} fine.c\nshort\n");
        let sink = RuleSink::to_file(&dest).unwrap();
        let err = generate_into(Cursor::new(input.into_bytes()), sink, &GenerateConfig::default())
            .unwrap_err();

        assert!(matches!(err, RuleError::MalformedRecord { line: 2, .. }));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "previous run\n");
    }

    #[test]
    fn successful_pass_overwrites_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("gawsh.mk");
        fs::write(&dest, "previous run\n").unwrap();

        let a = "a".repeat(40);
        let sink = RuleSink::to_file(&dest).unwrap();
        let report = generate_into(
            Cursor::new(format!("{a} fine.c\n").into_bytes()),
            sink,
            &GenerateConfig::default(),
        )
        .unwrap();

        let text = fs::read_to_string(&dest).unwrap();
        assert!(text.starts_with("# Generated by gawsh"));
        assert_eq!(report.rule_bytes, text.len());
    }

    #[test]
    fn malformed_input_writes_nothing_to_stdout() {
        let shared = SharedBuf::default();
        let sink = RuleSink::to_writer(Box::new(shared.clone()));

        let a = "a".repeat(40);
        let input = format!("{a} ok.c\nshort\n");
        let err = generate_into(Cursor::new(input.into_bytes()), sink, &GenerateConfig::default())
            .unwrap_err();

        assert!(matches!(err, RuleError::MalformedRecord { line: 2, .. }));
        assert!(shared.0.lock().unwrap().is_empty());
    }

    #[test]
    fn successful_pass_reaches_stdout() {
        let shared = SharedBuf::default();
        let sink = RuleSink::to_writer(Box::new(shared.clone()));

        let a = "a".repeat(40);
        let report = generate_into(
            Cursor::new(format!("{a} ok.c\n").into_bytes()),
            sink,
            &GenerateConfig::default(),
        )
        .unwrap();

        let written = shared.0.lock().unwrap();
        assert_eq!(written.len(), report.rule_bytes);
        assert!(written.starts_with(b"# Generated by gawsh"));
    }
}
