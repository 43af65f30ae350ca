//! Foundation types for gawsh.
//!
//! gawsh renders every distinct blob of a git repository's history to a
//! static HTML fragment, keyed by content hash rather than path or commit.
//! This crate holds the types every other gawsh crate agrees on.
//!
//! # Key Types
//!
//! - [`ContentId`] -- Fixed-length hex identifier naming an immutable blob
//! - [`ObjectRecord`] -- A content identifier paired with its display filename

pub mod error;
pub mod object;
pub mod record;

pub use error::TypeError;
pub use object::{ContentId, DEFAULT_OID_LENGTH};
pub use record::ObjectRecord;
