use anyhow::Result as AnyResult;
use auto_impl::auto_impl;

use crate::{Duration, OptModel, callback::OptCallbackFn, error::SearchError};

/// Optimizer that implements local search algorithm
#[auto_impl(&, Box, Rc, Arc)]
pub trait LocalSearchOptimizer<M: OptModel> {
    /// Start optimization from an already validated and scored solution
    ///
    /// Errors raised by the model stop the search and are returned as is.
    fn optimize(
        &self,
        model: &M,
        initial_solution: M::SolutionType,
        initial_score: M::ScoreType,
        n_iter: usize,
        time_limit: Duration,
        callback: &mut dyn OptCallbackFn<M::SolutionType, M::ScoreType>,
    ) -> AnyResult<(M::SolutionType, M::ScoreType)>;

    /// Start optimization
    ///
    /// - `model` : the model to optimize
    /// - `initial_solution` : the initial solution to start optimization
    /// - `n_iter`: maximum iterations, must be positive
    /// - `time_limit`: maximum iteration time
    fn run(
        &self,
        model: &M,
        initial_solution: M::SolutionType,
        n_iter: usize,
        time_limit: Duration,
    ) -> AnyResult<(M::SolutionType, M::ScoreType)> {
        self.run_with_callback(model, initial_solution, n_iter, time_limit, &mut |_| {})
    }

    /// Start optimization with a progress callback
    ///
    /// - `model` : the model to optimize
    /// - `initial_solution` : the initial solution to start optimization
    /// - `n_iter`: maximum iterations, must be positive
    /// - `time_limit`: maximum iteration time
    /// - `callback` : callback function that will be invoked with the search progress
    fn run_with_callback(
        &self,
        model: &M,
        initial_solution: M::SolutionType,
        n_iter: usize,
        time_limit: Duration,
        callback: &mut dyn OptCallbackFn<M::SolutionType, M::ScoreType>,
    ) -> AnyResult<(M::SolutionType, M::ScoreType)> {
        if n_iter == 0 {
            return Err(SearchError::InvalidIterationBudget(n_iter).into());
        }
        model.validate_solution(&initial_solution)?;
        let initial_score = model.evaluate_solution(&initial_solution)?;

        self.optimize(
            model,
            initial_solution,
            initial_score,
            n_iter,
            time_limit,
            callback,
        )
    }
}
