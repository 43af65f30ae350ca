//! Build-rule generation for gawsh.
//!
//! Turns a listing of `<blob id> <path>` lines covering a repository's whole
//! history into a make file with one rule per distinct blob, plus one
//! umbrella rule depending on all of them. Running that file with a parallel
//! make renders every blob to `<output-root>/oids/<id>/index.html` exactly
//! once, however many paths and commits share it.
//!
//! # Pipeline
//!
//! - [`parse_record`] -- one line to an [`ObjectRecord`](gawsh_types::ObjectRecord)
//! - [`Deduplicator`] -- streaming fold, first sighting of an id wins
//! - [`RuleSynthesizer`] -- record to [`BuildRule`], quoting the filename
//! - [`generate`] / [`generate_into`] -- the whole pass, with the umbrella
//!
//! # Design Rules
//!
//! 1. A target path depends on the blob id alone.
//! 2. Any bad input line aborts the pass; no rule file is released.
//! 3. The rule file is rewritten wholesale each run; freshness is make's job.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod generate;
pub mod parser;
pub mod rule;
pub mod rulefile;
pub mod sink;

pub use aggregate::Deduplicator;
pub use config::GenerateConfig;
pub use error::{MalformedReason, RuleError, RuleResult};
pub use generate::{generate, generate_into, GenerateReport};
pub use parser::{basename, parse_record};
pub use rule::{escape_recipe, shell_quote, target_path, BuildRule, RuleSynthesizer, UmbrellaRule};
pub use rulefile::RuleFileWriter;
pub use sink::{ensure_parent_dir, RuleSink};
