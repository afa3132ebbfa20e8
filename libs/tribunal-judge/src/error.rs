use thiserror::Error;

/// Invocation-level failures of the judging engine.
///
/// Only these propagate to the caller. Per-test failures (crashes,
/// timeouts, launch failures, output mismatches) are absorbed into the
/// `failed_cases` list of the result and never surface here.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Rejected before assembly; nothing was written to disk.
    #[error("submitted code must not be empty")]
    EmptySubmission,

    /// Workspace could not be set up. Fatal before any compilation.
    #[error("workspace setup failed: {0}")]
    Workspace(#[from] std::io::Error),

    /// The assembled translation unit failed to compile. Carries the
    /// compiler's diagnostic text verbatim; zero test cases were run.
    #[error("compilation failed:\n{diagnostics}")]
    Compile { diagnostics: String },

    /// The sandbox runtime itself failed during compilation (daemon
    /// unreachable, image pull failure, ...).
    #[error("sandbox failure: {0}")]
    Sandbox(#[from] anyhow::Error),
}
