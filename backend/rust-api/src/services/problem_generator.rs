use rand::Rng;

use super::difficulty;
use crate::metrics::PROBLEMS_GENERATED_TOTAL;
use crate::models::{Operands, Operation, Problem};

const ADDITION_RANGE: (u32, u32) = (1, 100);
const SUBTRACTION_RANGE: (u32, u32) = (1, 100);
const MULTIPLICATION_RANGE: (u32, u32) = (1, 12);
/// Divisor and quotient are both drawn from this range.
const DIVISION_FACTOR_RANGE: (u32, u32) = (2, 12);

/// Draws random operands per operation and scores them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemGenerator;

impl ProblemGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate<R: Rng + ?Sized>(&self, operation: Operation, rng: &mut R) -> Problem {
        match operation {
            Operation::Addition => self.generate_addition(rng),
            Operation::Subtraction => self.generate_subtraction(rng),
            Operation::Multiplication => self.generate_multiplication(rng),
            Operation::Division => self.generate_division(rng),
        }
    }

    /// Generates `count` problems, each of an operation picked uniformly from
    /// `operations`. Returns nothing when `operations` is empty.
    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        operations: &[Operation],
        count: usize,
        rng: &mut R,
    ) -> Vec<Problem> {
        if operations.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let operation = operations[rng.random_range(0..operations.len())];
                PROBLEMS_GENERATED_TOTAL
                    .with_label_values(&[operation.as_str(), "random"])
                    .inc();
                self.generate(operation, rng)
            })
            .collect()
    }

    fn generate_addition<R: Rng + ?Sized>(&self, rng: &mut R) -> Problem {
        let (min, max) = ADDITION_RANGE;
        let a = rng.random_range(min..=max);
        let b = rng.random_range(min..=max);
        Self::build(Operation::Addition, a, b, i64::from(a) + i64::from(b))
    }

    fn generate_subtraction<R: Rng + ?Sized>(&self, rng: &mut R) -> Problem {
        let (min, max) = SUBTRACTION_RANGE;
        let a = rng.random_range(min..=max);
        let b = rng.random_range(min..=a);
        Self::build(Operation::Subtraction, a, b, i64::from(a) - i64::from(b))
    }

    fn generate_multiplication<R: Rng + ?Sized>(&self, rng: &mut R) -> Problem {
        let (min, max) = MULTIPLICATION_RANGE;
        let a = rng.random_range(min..=max);
        let b = rng.random_range(min..=max);
        Self::build(Operation::Multiplication, a, b, i64::from(a) * i64::from(b))
    }

    fn generate_division<R: Rng + ?Sized>(&self, rng: &mut R) -> Problem {
        let (min, max) = DIVISION_FACTOR_RANGE;
        let divisor = rng.random_range(min..=max);
        let quotient = rng.random_range(min..=max);
        let dividend = divisor * quotient;
        Self::build(Operation::Division, dividend, divisor, i64::from(quotient))
    }

    fn build(operation: Operation, left: u32, right: u32, answer: i64) -> Problem {
        let operands = Operands::new(left, right);
        let difficulty = difficulty::score(operation, operands);
        Problem::new(operation, operands, answer, difficulty)
    }
}
