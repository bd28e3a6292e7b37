//! Function-injection entry points
//!
//! [`search`] takes a cost closure and a perturbation closure and runs
//! [`GreedyDescentOptimizer`] over a [`Configuration`]. The perturbation
//! closure owns its randomness, see [`crate::perturb::shuffle_row_fn`].

use std::fmt::Debug;

use anyhow::Result as AnyResult;

use crate::{
    Duration,
    callback::OptProgress,
    grid::Configuration,
    model::{FnCost, GridModel},
    optim::{GreedyDescentOptimizer, LocalSearchOptimizer},
    perturb::FnPerturbation,
};

/// Minimize `cost_fn` starting from `initial` for `iterations` iterations.
///
/// Returns the best configuration found and its cost, which is never above
/// the cost of `initial`.
///
/// Fails with [`crate::SearchError::InvalidConfiguration`] when a row of
/// `initial` is not a permutation of its category and with
/// [`crate::SearchError::InvalidIterationBudget`] when `iterations` is 0.
/// Errors returned by `cost_fn` or `perturb_fn` end the search and are
/// returned unchanged.
pub fn search<C, SC, P>(
    initial: Configuration,
    cost_fn: C,
    perturb_fn: P,
    iterations: usize,
) -> AnyResult<(Configuration, SC)>
where
    C: Fn(&Configuration) -> AnyResult<SC>,
    SC: Ord + Copy + Debug,
    P: FnMut(Configuration) -> AnyResult<Configuration>,
{
    search_with_callback(initial, cost_fn, perturb_fn, iterations, usize::MAX, |_, _| {})
}

/// [`search`] with a progress observer.
///
/// `on_iteration(i, current_cost)` is called on iteration 0, every
/// `report_interval` iterations after that and on the last iteration.
pub fn search_with_callback<C, SC, P, O>(
    initial: Configuration,
    cost_fn: C,
    perturb_fn: P,
    iterations: usize,
    report_interval: usize,
    mut on_iteration: O,
) -> AnyResult<(Configuration, SC)>
where
    C: Fn(&Configuration) -> AnyResult<SC>,
    SC: Ord + Copy + Debug,
    P: FnMut(Configuration) -> AnyResult<Configuration>,
    O: FnMut(usize, SC),
{
    let model = GridModel::new(FnPerturbation::new(perturb_fn), FnCost::new(cost_fn));
    let optimizer = GreedyDescentOptimizer::new().with_report_interval(report_interval);
    optimizer.run_with_callback(
        &model,
        initial,
        iterations,
        Duration::MAX,
        &mut |progress: OptProgress<Configuration, SC>| {
            on_iteration(progress.iter, progress.score)
        },
    )
}
