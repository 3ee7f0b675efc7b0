//! Dumpling Differential Oracle
//!
//! Decides whether the frames dumped by an optimizing tier are consistent
//! with the frames dumped by the interpreter and baseline tiers for the same
//! program run. A `false` verdict is a candidate miscompilation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod matcher;
pub mod oracle;
pub mod report;

pub use config::OracleConfig;
pub use error::{OracleError, OracleResult, TraceSide};
pub use matcher::{Matcher, Verdict, value_matches};
pub use oracle::{DiffOracle, relate};
pub use report::{Candidate, Mismatch};
