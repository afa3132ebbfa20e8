// In-memory problem store.
//
// Stands in for the relational problem store behind the same handle shape
// the handlers consume: read access keyed by problem id. Mutation happens
// only through authoring-style inserts, never during judging.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tribunal_common::types::{Problem, TestCase};

pub struct ProblemStore {
    problems: RwLock<HashMap<u32, Problem>>,
}

impl ProblemStore {
    pub fn new() -> Self {
        Self {
            problems: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, problem: Problem) {
        self.problems.write().unwrap().insert(problem.id, problem);
    }

    pub fn get(&self, id: u32) -> Option<Problem> {
        self.problems.read().unwrap().get(&id).cloned()
    }

    pub fn list(&self) -> Vec<Problem> {
        let mut problems: Vec<Problem> = self.problems.read().unwrap().values().cloned().collect();
        problems.sort_by_key(|p| p.id);
        problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.read().unwrap().is_empty()
    }

    /// Seed the three sample problems if the store is empty.
    pub fn seed_samples(&self) {
        if !self.is_empty() {
            return;
        }
        for problem in sample_problems() {
            self.insert(problem);
        }
    }
}

impl Default for ProblemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn make_cases(problem_id: u32, cases: &[(&str, &str)]) -> Vec<TestCase> {
    cases
        .iter()
        .enumerate()
        .map(|(idx, (input, expected))| TestCase {
            id: problem_id * 100 + (idx + 1) as u32,
            problem_id,
            input: input.to_string(),
            expected_output: expected.to_string(),
        })
        .collect()
}

fn sample_problems() -> Vec<Problem> {
    vec![
        Problem {
            id: 1,
            title: "Sum of Two Numbers".to_string(),
            description: "Implement `int sum(int a, int b)` returning the sum of a and b.\n\n\
                          **Input**: two integers a and b, separated by a space\n\
                          **Output**: the sum of a and b"
                .to_string(),
            prelude: "#include <iostream>\n".to_string(),
            harness: "int main() {\n    int a, b;\n    std::cin >> a >> b;\n    std::cout << sum(a, b) << std::endl;\n    return 0;\n}\n".to_string(),
            test_cases: make_cases(1, &[("1 2", "3"), ("10 5", "15"), ("-3 3", "0"), ("100 -50", "50")]),
            created_at: Utc::now(),
        },
        Problem {
            id: 2,
            title: "Reverse String".to_string(),
            description: "Implement `std::string reverse_string(const std::string &s)` returning s reversed.\n\n\
                          **Input**: a string (up to 100 characters)\n\
                          **Output**: the string in reverse order"
                .to_string(),
            prelude: "#include <iostream>\n#include <string>\n".to_string(),
            harness: "int main() {\n    std::string s;\n    std::cin >> s;\n    std::cout << reverse_string(s) << std::endl;\n    return 0;\n}\n".to_string(),
            test_cases: make_cases(
                2,
                &[("hello", "olleh"), ("algorithm", "mhtirogla"), ("a", "a"), ("12345", "54321")],
            ),
            created_at: Utc::now(),
        },
        Problem {
            id: 3,
            title: "Check Prime Number".to_string(),
            description: "Implement `bool is_prime(int n)` deciding whether n is prime.\n\n\
                          **Input**: an integer n\n\
                          **Output**: 'Prime' if n is prime, 'Not Prime' otherwise"
                .to_string(),
            prelude: "#include <iostream>\n".to_string(),
            harness: "int main() {\n    int n;\n    std::cin >> n;\n    std::cout << (is_prime(n) ? \"Prime\" : \"Not Prime\") << std::endl;\n    return 0;\n}\n".to_string(),
            test_cases: make_cases(
                3,
                &[("7", "Prime"), ("15", "Not Prime"), ("2", "Prime"), ("1", "Not Prime"), ("97", "Prime")],
            ),
            created_at: Utc::now(),
        },
    ]
}
