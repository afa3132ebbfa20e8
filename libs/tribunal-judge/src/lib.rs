//! Judging engine: compiles an untrusted submission together with
//! problem-supplied fragments and runs it against hidden test cases inside
//! resource-capped containers.
//!
//! The flow is one-directional: submission text + problem fragments →
//! assembled translation unit → compiled binary → per-test execution →
//! comparison → aggregated [`tribunal_common::types::JudgeResult`].

pub mod assemble;
pub mod error;
pub mod judge;
pub mod sandbox;
pub mod verdict;
pub mod workspace;


pub use error::JudgeError;
pub use judge::Judge;
pub use sandbox::{CompileOutcome, ContainerSandbox, RunLimits, RunOutcome, Sandbox};
pub use workspace::Workspace;
