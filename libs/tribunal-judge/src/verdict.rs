// Output comparison: the pass/fail classification of one test case.

/// Pass/fail classification of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Normalize an output for comparison: trim leading and trailing
/// whitespace only. Internal whitespace, empty lines and case are
/// preserved.
fn normalize(output: &str) -> &str {
    output.trim()
}

/// Compare actual against expected output.
///
/// Deliberately loose on outer whitespace (tolerates a trailing newline
/// discrepancy), otherwise exact. Not a numeric-tolerance or token-based
/// comparator.
pub fn compare(actual: &str, expected: &str) -> Verdict {
    if normalize(actual) == normalize(expected) {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_is_tolerated() {
        assert_eq!(compare("3\n", "3"), Verdict::Pass);
    }

    #[test]
    fn trailing_space_is_tolerated() {
        assert_eq!(compare("3 ", "3"), Verdict::Pass);
    }

    #[test]
    fn outer_whitespace_on_either_side_is_tolerated() {
        assert_eq!(compare(" 3", "3 "), Verdict::Pass);
        assert_eq!(compare("\n  hello  \n", "hello"), Verdict::Pass);
    }

    #[test]
    fn internal_whitespace_is_significant() {
        assert_eq!(compare("1  2", "1 2"), Verdict::Fail);
        assert_eq!(compare("a\n\nb", "a\nb"), Verdict::Fail);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(compare("Hello", "hello"), Verdict::Fail);
    }

    #[test]
    fn whitespace_only_output_matches_empty_expectation() {
        assert_eq!(compare("   \n", ""), Verdict::Pass);
    }

    #[test]
    fn mismatch_fails() {
        assert_eq!(compare("4", "3"), Verdict::Fail);
    }
}
