// Source assembly: the single place that knows how problem fragments and
// the submitted body combine into one translation unit.

use tribunal_common::types::Problem;

use crate::error::JudgeError;

/// Concatenate prelude, submitted body and harness into one translation
/// unit.
///
/// The order is a hard requirement: the harness references symbols the
/// submission must define, and the prelude may declare types/signatures
/// the submission depends on. Swapping the language backend only changes
/// this step.
pub fn assemble(problem: &Problem, submitted: &str) -> Result<String, JudgeError> {
    if submitted.trim().is_empty() {
        return Err(JudgeError::EmptySubmission);
    }

    let fragments = [problem.prelude.as_str(), submitted, problem.harness.as_str()];
    let mut unit = String::with_capacity(fragments.iter().map(|f| f.len() + 1).sum());
    for fragment in fragments {
        unit.push_str(fragment);
        if !fragment.ends_with('\n') {
            unit.push('\n');
        }
    }
    Ok(unit)
}
