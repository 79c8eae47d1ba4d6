use log::debug;

/// Outcome of evaluating a free-text arithmetic expression. A `Defaulted`
/// result stands for every failure kind: empty input, a syntax error, an
/// unknown token, or a non-finite value such as division by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Value(f64),
    Defaulted,
}

impl Evaluation {
    /// Collapses a failed evaluation to zero grams.
    pub fn grams(self) -> f64 {
        match self {
            Evaluation::Value(value) => value,
            Evaluation::Defaulted => 0.0,
        }
    }
}

#[mockall::automock]
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, expression: &str) -> Evaluation;
}

struct MevalEvaluator;

impl Evaluator for MevalEvaluator {
    fn evaluate(&self, expression: &str) -> Evaluation {
        if expression.trim().is_empty() {
            return Evaluation::Defaulted;
        }

        match meval::eval_str(expression) {
            Ok(value) if value.is_finite() => Evaluation::Value(value),
            Ok(value) => {
                debug!("Expression {:?} evaluated to non-finite {}", expression, value);
                Evaluation::Defaulted
            }
            Err(e) => {
                debug!("Failed to evaluate {:?}: {}", expression, e);
                Evaluation::Defaulted
            }
        }
    }
}

pub fn create() -> Box<dyn Evaluator> {
    Box::new(MevalEvaluator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_arithmetic_expressions() {
        let test_data = [
            ("2+2", 4.0),
            ("10/4", 2.5),
            ("(3+5)*2.5", 20.0),
            ("100-7*3", 79.0),
            ("250.5", 250.5),
        ];

        let evaluator = create();
        for (expression, expected) in test_data {
            assert_eq!(evaluator.evaluate(expression), Evaluation::Value(expected));
        }
    }

    #[test]
    fn failures_collapse_to_defaulted() {
        let test_data = ["", "   ", "2/0", "0/0", "2+", "grams", "1..2"];

        let evaluator = create();
        for expression in test_data {
            assert_eq!(evaluator.evaluate(expression), Evaluation::Defaulted);
        }
    }

    #[test]
    fn defaulted_evaluation_is_zero_grams() {
        assert_eq!(Evaluation::Defaulted.grams(), 0.0);
        assert_eq!(Evaluation::Value(123.25).grams(), 123.25);
    }
}
