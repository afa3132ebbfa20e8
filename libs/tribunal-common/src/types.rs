use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coding problem with its hidden test cases.
///
/// A problem owns three source fragments that surround the submitted code:
/// - `prelude`: declarations/includes visible to the submission
/// - the submission itself (supplied per judge invocation, never stored)
/// - `harness`: the driver containing `main`, calling into the submission
///
/// Immutable once judging begins; only problem-authoring workflows mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub prelude: String,
    pub harness: String,
    pub test_cases: Vec<TestCase>,
    pub created_at: DateTime<Utc>,
}

/// A single hidden test case. Read-only from the judge's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: u32,
    pub problem_id: u32,
    pub input: String,
    pub expected_output: String,
}

/// Aggregated verdict for one judge invocation.
///
/// `failed_cases` holds 1-based indices in test-case order. Produced once
/// per invocation and never persisted by the judge itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeResult {
    pub passed: usize,
    pub total: usize,
    pub failed_cases: Vec<usize>,
}

impl JudgeResult {
    /// A submission succeeds only when every test case passed.
    pub fn is_success(&self) -> bool {
        self.passed == self.total
    }
}
