use rand::Rng;
use std::collections::BTreeMap;

use super::{
    performance_tracker::{PerformanceTracker, TrackerSettings},
    problem_generator::ProblemGenerator,
};
use crate::metrics::{PROBLEMS_GENERATED_TOTAL, SESSION_RESETS_TOTAL};
use crate::models::{Operation, Problem, StudentInsights};

/// Generates problems biased towards the student's weak operations and
/// tuned to their recent performance.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveProblemService {
    generator: ProblemGenerator,
    tracker: PerformanceTracker,
}

impl AdaptiveProblemService {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            generator: ProblemGenerator::new(),
            tracker: PerformanceTracker::new(settings),
        }
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    /// Discards all history, keeping the configured thresholds.
    pub fn reset(&mut self) {
        let settings = self.tracker.settings().clone();
        tracing::info!(
            "Resetting session after {} attempts",
            self.tracker.total_attempts()
        );
        self.tracker = PerformanceTracker::new(settings);
        SESSION_RESETS_TOTAL.inc();
    }

    /// Returns `count` problems sorted by their adjusted difficulty.
    pub fn generate_adaptive_problems<R: Rng + ?Sized>(
        &self,
        operations: &[Operation],
        count: usize,
        rng: &mut R,
    ) -> Vec<Problem> {
        let weak_areas = self.tracker.weak_areas();
        let weights = weight_operations(operations, &weak_areas);

        let mut problems = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(operation) = choose_weighted_operation(&weights, rng) else {
                break;
            };

            let mut problem = self.generator.generate(operation, rng);
            problem.difficulty = self
                .tracker
                .predict_difficulty(operation, problem.difficulty);
            problem.adaptive = true;

            PROBLEMS_GENERATED_TOTAL
                .with_label_values(&[operation.as_str(), "adaptive"])
                .inc();

            problems.push(problem);
        }

        problems.sort_by_key(|problem| problem.difficulty);

        tracing::info!(
            "Generated {} adaptive problems from {:?} (weak areas: {:?})",
            problems.len(),
            operations,
            weak_areas
        );

        problems
    }

    /// Plain uniform generation without any adjustment.
    pub fn generate_problems<R: Rng + ?Sized>(
        &self,
        operations: &[Operation],
        count: usize,
        rng: &mut R,
    ) -> Vec<Problem> {
        self.generator.generate_batch(operations, count, rng)
    }

    pub fn record_student_attempt(&mut self, problem: &Problem, user_answer: i64, time_taken: f64) {
        self.tracker.record_attempt(problem, user_answer, time_taken);
    }

    pub fn student_insights(&self) -> StudentInsights {
        let total = self.tracker.total_attempts();
        if total == 0 {
            return StudentInsights::empty();
        }

        let weak_areas = self.tracker.weak_areas();
        let recommended_focus = weakest_operation(&weak_areas);

        StudentInsights {
            message: None,
            total_problems_attempted: total,
            recent_accuracy: self
                .tracker
                .recent_accuracy(self.tracker.settings().insights_window),
            weak_areas: Some(weak_areas),
            most_common_mistakes: Some(self.tracker.mistake_counts()),
            recommended_focus,
        }
    }
}

/// Every allowed operation gets weight `1 + 2 * weakness`; unseen
/// operations count as weakness 0. Repeated operations are weighted once,
/// in order of first appearance.
pub fn weight_operations(
    operations: &[Operation],
    weak_areas: &BTreeMap<Operation, f64>,
) -> Vec<(Operation, f64)> {
    let mut weights: Vec<(Operation, f64)> = Vec::with_capacity(operations.len());
    for operation in operations {
        if weights.iter().any(|(seen, _)| seen == operation) {
            continue;
        }
        let weakness = weak_areas.get(operation).copied().unwrap_or(0.0);
        weights.push((*operation, 1.0 + weakness * 2.0));
    }
    weights
}

/// Cumulative-weight scan over a single uniform draw in `[0, total)`.
pub fn choose_weighted_operation<R: Rng + ?Sized>(
    weights: &[(Operation, f64)],
    rng: &mut R,
) -> Option<Operation> {
    let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
    let draw = rng.random::<f64>() * total;
    pick_by_draw(weights, draw)
}

fn pick_by_draw(weights: &[(Operation, f64)], draw: f64) -> Option<Operation> {
    let mut cumulative = 0.0;
    for (operation, weight) in weights {
        cumulative += weight;
        if draw <= cumulative {
            return Some(*operation);
        }
    }
    weights.last().map(|(operation, _)| *operation)
}

/// Highest weakness wins; ties go to the earliest operation.
fn weakest_operation(weak_areas: &BTreeMap<Operation, f64>) -> Option<Operation> {
    let mut weakest: Option<(Operation, f64)> = None;
    for (operation, weakness) in weak_areas {
        match weakest {
            Some((_, best)) if *weakness <= best => {}
            _ => weakest = Some((*operation, *weakness)),
        }
    }
    weakest.map(|(operation, _)| operation)
}
