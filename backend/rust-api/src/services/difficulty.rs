//! Difficulty heuristics for freshly drawn operands.
//!
//! Scores start at 1 and grow with operand size and with the carrying,
//! borrowing or fact-recall effort the operands imply. There is no upper cap
//! here; the tracker caps only its own adjustments.

use crate::models::{Operands, Operation};

pub fn score(operation: Operation, operands: Operands) -> u32 {
    let Operands { left, right } = operands;
    match operation {
        Operation::Addition => addition(left, right),
        Operation::Subtraction => subtraction(left, right),
        Operation::Multiplication => multiplication(left, right),
        Operation::Division => division(left, right),
    }
}

pub fn addition(a: u32, b: u32) -> u32 {
    let mut difficulty = 1;

    let largest = a.max(b);
    if largest > 50 {
        difficulty += 2;
    } else if largest > 20 {
        difficulty += 1;
    }

    // Carry into the tens column
    if a % 10 + b % 10 >= 10 {
        difficulty += 2;
    }
    // Carry into the hundreds column
    if a / 10 + b / 10 >= 10 {
        difficulty += 1;
    }

    difficulty
}

/// Expects `a >= b`; smaller minuends still score but never go negative.
pub fn subtraction(a: u32, b: u32) -> u32 {
    let mut difficulty = 1;

    if a > 50 {
        difficulty += 2;
    } else if a > 20 {
        difficulty += 1;
    }

    // Borrow from the tens column
    if a % 10 < b % 10 {
        difficulty += 3;
    }
    if a < b.saturating_mul(10) {
        difficulty += 1;
    }

    difficulty
}

const EASY_FACTORS: [u32; 3] = [2, 5, 10];

pub fn multiplication(a: u32, b: u32) -> u32 {
    let mut difficulty = 1;

    let largest = a.max(b);
    if EASY_FACTORS.contains(&a) || EASY_FACTORS.contains(&b) {
        // Skip-counting facts add nothing
    } else if largest <= 9 {
        difficulty += 2;
    } else if largest > 10 {
        difficulty += 4;
    }

    if a > 10 || b > 10 {
        difficulty += 2;
    }

    difficulty
}

pub fn division(dividend: u32, divisor: u32) -> u32 {
    let mut difficulty = 1;
    let quotient = dividend.checked_div(divisor).unwrap_or(0);

    if divisor <= 5 {
        difficulty += 1;
    } else if divisor <= 10 {
        difficulty += 2;
    } else {
        difficulty += 3;
    }

    if quotient > 10 {
        difficulty += 2;
    } else if quotient > 5 {
        difficulty += 1;
    }

    difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_small_without_carry_is_base() {
        assert_eq!(addition(3, 4), 1);
    }

    #[test]
    fn addition_accounts_for_size_and_carries() {
        // 25 + 7: size +1, units carry +2
        assert_eq!(addition(25, 7), 4);
        // 58 + 67: size +2, units carry +2, tens carry +1
        assert_eq!(addition(58, 67), 6);
        // 60 + 40: size +2, tens carry +1
        assert_eq!(addition(60, 40), 4);
    }

    #[test]
    fn subtraction_borrow_and_ratio() {
        // 9 - 3: 9 < 30
        assert_eq!(subtraction(9, 3), 2);
        // 42 - 7: size +1, borrow +3, 42 < 70 +1
        assert_eq!(subtraction(42, 7), 6);
        // 95 - 2: size +2
        assert_eq!(subtraction(95, 2), 3);
    }

    #[test]
    fn subtraction_grows_across_size_thresholds() {
        let b = 0;
        let low = subtraction(20, b);
        let mid = subtraction(21, b);
        let high = subtraction(51, b);
        assert_eq!(subtraction(50, b), mid);
        assert!(low >= 1);
        assert!(mid > low, "crossing 20 should increase difficulty");
        assert!(high > mid, "crossing 50 should increase difficulty");
    }

    #[test]
    fn subtraction_is_total_for_large_subtrahend() {
        assert!(subtraction(u32::MAX, u32::MAX) >= 1);
    }

    #[test]
    fn multiplication_easy_factors_add_nothing() {
        assert_eq!(multiplication(2, 9), 1);
        assert_eq!(multiplication(5, 7), 1);
        assert_eq!(multiplication(10, 12), 3);
    }

    #[test]
    fn multiplication_harder_facts() {
        assert_eq!(multiplication(7, 8), 3);
        assert_eq!(multiplication(11, 12), 7);
    }

    #[test]
    fn division_by_divisor_and_quotient() {
        assert_eq!(division(12, 3), 2);
        assert_eq!(division(56, 7), 4);
        assert_eq!(division(132, 11), 6);
    }

    #[test]
    fn division_by_zero_still_scores() {
        assert_eq!(division(10, 0), 2);
    }

    #[test]
    fn score_dispatches_by_operation() {
        let operands = Operands::new(58, 67);
        assert_eq!(score(Operation::Addition, operands), addition(58, 67));
        assert_eq!(
            score(Operation::Division, Operands::new(56, 7)),
            division(56, 7)
        );
    }
}
