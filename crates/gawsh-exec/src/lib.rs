//! Job runner integration for gawsh.
//!
//! gawsh only writes the rule file; a parallel make does the rendering,
//! the up-to-date checks, and the scheduling. This crate is the seam:
//! [`RuleExecutor`] abstracts "run this rule file", [`MakeExecutor`] spawns
//! make, and [`DryRunExecutor`] prints what would run.

pub mod error;
pub mod make;
pub mod traits;

pub use error::{ExecError, ExecResult};
pub use make::{DryRunExecutor, MakeExecutor};
pub use traits::{ExecPlan, ExecReport, RuleExecutor};
