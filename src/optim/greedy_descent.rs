use std::{cell::RefCell, rc::Rc};

use anyhow::Result as AnyResult;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{
    Duration, OptModel,
    callback::{OptCallbackFn, OptProgress},
    cancel::CancelToken,
    time_wrapper::Deadline,
};

use super::LocalSearchOptimizer;

/// Optimizer that implements greedy descent
///
/// Every iteration perturbs a copy of the current solution and moves to it
/// only when its score is strictly lower. Equal-score candidates are
/// rejected, so the search can stall on plateaus.
#[derive(Debug, Clone)]
pub struct GreedyDescentOptimizer {
    seed: Option<u64>,
    report_interval: usize,
    patience: usize,
    cancel_token: Option<CancelToken>,
}

impl Default for GreedyDescentOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GreedyDescentOptimizer {
    /// Constructor of GreedyDescentOptimizer
    ///
    /// The generator is seeded from the thread rng, progress is reported on
    /// every iteration and the full iteration budget is always used.
    pub fn new() -> Self {
        Self {
            seed: None,
            report_interval: 1,
            patience: usize::MAX,
            cancel_token: None,
        }
    }

    /// Seed the random number generator; identical inputs then give identical runs.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Invoke the callback every `report_interval` iterations (0 is treated as 1).
    /// The last iteration of the budget and a patience stop are always reported;
    /// a cancellation or time-limit stop is not.
    pub fn with_report_interval(self, report_interval: usize) -> Self {
        Self {
            report_interval: report_interval.max(1),
            ..self
        }
    }

    /// Stop early after `patience` consecutive iterations without improvement.
    pub fn with_patience(self, patience: usize) -> Self {
        Self {
            patience: patience.max(1),
            ..self
        }
    }

    /// Poll `token` once per iteration and stop when it is cancelled.
    pub fn with_cancel_token(self, token: CancelToken) -> Self {
        Self {
            cancel_token: Some(token),
            ..self
        }
    }

    fn should_stop(&self, deadline: &Deadline, it: usize) -> bool {
        if self
            .cancel_token
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
        {
            debug!(iter = it, "greedy descent cancelled");
            return true;
        }
        if deadline.expired() {
            debug!(iter = it, "greedy descent reached its time limit");
            return true;
        }
        false
    }
}

impl<M: OptModel> LocalSearchOptimizer<M> for GreedyDescentOptimizer {
    /// Start optimization
    ///
    /// - `model` : the model to optimize
    /// - `initial_solution` : the initial solution to start optimization
    /// - `initial_score` : the initial score of the initial solution
    /// - `n_iter`: maximum iterations
    /// - `time_limit`: maximum iteration time
    /// - `callback` : callback function that will be invoked every `report_interval` iterations
    fn optimize(
        &self,
        model: &M,
        initial_solution: M::SolutionType,
        initial_score: M::ScoreType,
        n_iter: usize,
        time_limit: Duration,
        callback: &mut dyn OptCallbackFn<M::SolutionType, M::ScoreType>,
    ) -> AnyResult<(M::SolutionType, M::ScoreType)> {
        let deadline = Deadline::new(time_limit);
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        debug!(seed, n_iter, initial_score = ?initial_score, "greedy descent started");

        let current_solution = Rc::new(RefCell::new(initial_solution));
        let mut current_score = initial_score;
        let mut accepted_counter = 0;
        let mut counter = 0;

        for it in 0..n_iter {
            if self.should_stop(&deadline, it) {
                break;
            }

            let trial_solution = current_solution.borrow().clone();
            let (trial_solution, trial_score) =
                model.generate_trial_solution(trial_solution, current_score, &mut rng)?;

            if trial_score < current_score {
                trace!(iter = it, from = ?current_score, to = ?trial_score, "accepted");
                current_solution.replace(trial_solution);
                current_score = trial_score;
                accepted_counter += 1;
                counter = 0;
            } else {
                counter += 1;
            }

            let exhausted = counter >= self.patience;
            if it % self.report_interval == 0 || it + 1 == n_iter || exhausted {
                let progress = OptProgress::new(
                    it,
                    accepted_counter,
                    current_solution.clone(),
                    current_score,
                );
                callback(progress);
            }

            if exhausted {
                debug!(iter = it, patience = self.patience, "greedy descent stalled");
                break;
            }
        }

        debug!(
            accepted = accepted_counter,
            score = ?current_score,
            "greedy descent finished"
        );
        let best_solution = (*current_solution.borrow()).clone();
        Ok((best_solution, current_score))
    }
}
