//! Judge orchestrator: sequences workspace acquisition, assembly,
//! compilation, per-case execution and comparison, and guarantees
//! workspace teardown on every path.

use tracing::{debug, info, warn};
use tribunal_common::types::{JudgeResult, Problem, TestCase};

use crate::assemble::assemble;
use crate::error::JudgeError;
use crate::sandbox::{RunLimits, RunOutcome, Sandbox};
use crate::verdict::{self, Verdict};
use crate::workspace::Workspace;

/// The judging engine. Owns its sandbox handle and limits; both are
/// injected by the caller, whose lifetime outlives all invocations.
pub struct Judge<S: Sandbox> {
    sandbox: S,
    limits: RunLimits,
}

impl<S: Sandbox> Judge<S> {
    pub fn new(sandbox: S, limits: RunLimits) -> Self {
        Self { sandbox, limits }
    }

    /// Judge one submission against a problem's hidden test cases.
    ///
    /// Fatal outcomes (`EmptySubmission`, `Workspace`, `Compile`,
    /// `Sandbox`) abort before any test case runs. Per-case failures are
    /// absorbed into `failed_cases` and never abort the remaining cases.
    /// The workspace is released on every path, success or not.
    pub async fn judge(
        &self,
        problem: &Problem,
        submitted: &str,
    ) -> Result<JudgeResult, JudgeError> {
        let workspace = Workspace::acquire()?;
        debug!(problem_id = problem.id, workspace = %workspace.path().display(), "workspace acquired");

        let result = self.judge_in(&workspace, problem, submitted).await;
        workspace.release();
        result
    }

    async fn judge_in(
        &self,
        workspace: &Workspace,
        problem: &Problem,
        submitted: &str,
    ) -> Result<JudgeResult, JudgeError> {
        let unit = assemble(problem, submitted)?;
        workspace.write_source(&unit)?;

        let compile = self.sandbox.compile(workspace).await?;
        if !compile.success {
            info!(
                problem_id = problem.id,
                diagnostics_preview = compile.diagnostics.lines().next().unwrap_or(""),
                "compilation failed"
            );
            return Err(JudgeError::Compile {
                diagnostics: compile.diagnostics,
            });
        }

        let total = problem.test_cases.len();
        let mut passed = 0;
        let mut failed_cases = Vec::new();

        for (idx, case) in problem.test_cases.iter().enumerate() {
            let case_no = idx + 1;
            match self.run_case(workspace, case).await {
                Verdict::Pass => {
                    passed += 1;
                    debug!(problem_id = problem.id, case_no, "test case passed");
                }
                Verdict::Fail => {
                    failed_cases.push(case_no);
                    debug!(problem_id = problem.id, case_no, "test case failed");
                }
            }
        }

        info!(problem_id = problem.id, passed, total, "judging complete");
        Ok(JudgeResult {
            passed,
            total,
            failed_cases,
        })
    }

    /// Execution stage for one test case: fresh input/expected files, one
    /// sandboxed run, then comparison. Any failure along the way is this
    /// case's failure and nothing more.
    async fn run_case(&self, workspace: &Workspace, case: &TestCase) -> Verdict {
        if let Err(e) = workspace.write_input(&case.input) {
            warn!(test_id = case.id, error = %e, "failed to write input file");
            return Verdict::Fail;
        }
        if let Err(e) = workspace.write_expected(&case.expected_output) {
            warn!(test_id = case.id, error = %e, "failed to write expected file");
            return Verdict::Fail;
        }

        match self.sandbox.run(workspace, &self.limits).await {
            RunOutcome::Exited(0) => {}
            RunOutcome::Exited(status) => {
                warn!(test_id = case.id, status, "run exited non-zero");
                return Verdict::Fail;
            }
            RunOutcome::TimedOut => {
                warn!(test_id = case.id, wall_time_ms = self.limits.wall_time_ms, "run timed out");
                return Verdict::Fail;
            }
            RunOutcome::LaunchFailed(reason) => {
                warn!(test_id = case.id, reason = %reason, "sandbox launch failed");
                return Verdict::Fail;
            }
        }

        let actual = match workspace.read_output() {
            Ok(actual) => actual,
            Err(e) => {
                warn!(test_id = case.id, error = %e, "failed to read output file");
                return Verdict::Fail;
            }
        };
        let expected = match workspace.read_expected() {
            Ok(expected) => expected,
            Err(e) => {
                warn!(test_id = case.id, error = %e, "failed to read expected file");
                return Verdict::Fail;
            }
        };

        verdict::compare(&actual, &expected)
    }
}
