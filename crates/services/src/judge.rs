//! Mock code runner for practice problems. No code is executed.

use studio_core::model::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Accepted,
    WrongAnswer,
}

/// Console lines produced by a run or a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeReport {
    pub verdict: Verdict,
    pub lines: Vec<String>,
}

impl JudgeReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.verdict != Verdict::WrongAnswer
    }
}

/// Echo the first example as a passing test case.
#[must_use]
pub fn run_examples(problem: &Problem) -> JudgeReport {
    let (input, output) = problem
        .examples
        .first()
        .map(|ex| (ex.input.as_str(), ex.output.as_str()))
        .unwrap_or_default();
    JudgeReport {
        verdict: Verdict::Passed,
        lines: vec![
            "Running test case 1...".to_string(),
            format!("Input: {input}"),
            format!("Expected Output: {output}"),
            format!("Your Output: {output}"),
            "Result: Passed!".to_string(),
        ],
    }
}

/// Accept any submission that returns or prints something.
#[must_use]
pub fn submit(code: &str) -> JudgeReport {
    if code.contains("return") || code.contains("printf") {
        JudgeReport {
            verdict: Verdict::Accepted,
            lines: vec![
                "Submission Accepted!".to_string(),
                "All test cases passed. Great job!".to_string(),
            ],
        }
    } else {
        JudgeReport {
            verdict: Verdict::WrongAnswer,
            lines: vec![
                "Submission Failed: Wrong Answer".to_string(),
                "Failed on test case 2: Expected \"5\", got \"0\"".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::Catalog;
    use studio_core::model::ProblemId;

    #[test]
    fn run_echoes_first_example() {
        let catalog = Catalog::builtin();
        let problem = catalog.problem(ProblemId::new(1)).unwrap();
        let report = run_examples(problem);

        assert!(report.is_success());
        assert_eq!(report.lines[1], format!("Input: {}", problem.examples[0].input));
        assert_eq!(report.lines[2].strip_prefix("Expected Output: "), report.lines[3].strip_prefix("Your Output: "));
    }

    #[test]
    fn submit_checks_for_return_or_printf() {
        assert_eq!(submit("def f():\n    return 1").verdict, Verdict::Accepted);
        assert_eq!(submit("printf(\"%d\", x);").verdict, Verdict::Accepted);

        let rejected = submit("pass");
        assert!(!rejected.is_success());
        assert_eq!(rejected.lines[0], "Submission Failed: Wrong Answer");
    }
}
