use std::{fmt::Debug, marker::PhantomData};

use anyhow::Result as AnyResult;
use auto_impl::auto_impl;

use crate::{grid::Configuration, perturb::Perturbation};

/// OptModel is a trait that defines requirements to be used with optimization algorithm
#[auto_impl(&, Box, Rc, Arc)]
pub trait OptModel {
    /// Type of the Score
    type ScoreType: Ord + Copy + Debug;
    /// Type of the Solution
    type SolutionType: Clone;

    /// Check a solution before the search starts
    fn validate_solution(&self, _solution: &Self::SolutionType) -> AnyResult<()> {
        Ok(())
    }

    /// Score a solution, lower is better
    fn evaluate_solution(&self, solution: &Self::SolutionType) -> AnyResult<Self::ScoreType>;

    /// Generate a new trial solution from a copy of the current solution
    fn generate_trial_solution<R: rand::Rng + ?Sized>(
        &self,
        current_solution: Self::SolutionType,
        current_score: Self::ScoreType,
        rng: &mut R,
    ) -> AnyResult<(Self::SolutionType, Self::ScoreType)>;
}

/// Cost of a configuration, lower is better.
///
/// Must be deterministic and must not depend on anything but its input.
#[auto_impl(&, Box, Rc, Arc)]
pub trait CostFunction {
    /// Score type
    type Score: Ord + Copy + Debug;

    /// Score `configuration`
    fn cost(&self, configuration: &Configuration) -> AnyResult<Self::Score>;
}

/// Adapter turning a closure into a [`CostFunction`]
#[derive(Clone, Copy)]
pub struct FnCost<F, SC> {
    f: F,
    phantom: PhantomData<fn() -> SC>,
}

impl<F, SC> FnCost<F, SC>
where
    F: Fn(&Configuration) -> AnyResult<SC>,
    SC: Ord + Copy + Debug,
{
    /// Wrap `f`
    pub fn new(f: F) -> Self {
        Self {
            f,
            phantom: PhantomData,
        }
    }
}

impl<F, SC> CostFunction for FnCost<F, SC>
where
    F: Fn(&Configuration) -> AnyResult<SC>,
    SC: Ord + Copy + Debug,
{
    type Score = SC;

    fn cost(&self, configuration: &Configuration) -> AnyResult<SC> {
        (self.f)(configuration)
    }
}

/// Model over [`Configuration`]s: a perturbation strategy plus a cost function
///
/// The initial configuration is rejected with
/// [`crate::SearchError::InvalidConfiguration`] when a row is not a permutation of
/// its category.
#[derive(Clone)]
pub struct GridModel<P, C> {
    perturbation: P,
    cost_fn: C,
}

impl<P: Perturbation, C: CostFunction> GridModel<P, C> {
    /// Constructor of GridModel
    pub fn new(perturbation: P, cost_fn: C) -> Self {
        Self {
            perturbation,
            cost_fn,
        }
    }

    /// the perturbation strategy
    pub fn perturbation(&self) -> &P {
        &self.perturbation
    }

    /// the cost function
    pub fn cost_fn(&self) -> &C {
        &self.cost_fn
    }
}

impl<P: Perturbation, C: CostFunction> OptModel for GridModel<P, C> {
    type ScoreType = C::Score;
    type SolutionType = Configuration;

    fn validate_solution(&self, solution: &Configuration) -> AnyResult<()> {
        solution.validate()?;
        Ok(())
    }

    fn evaluate_solution(&self, solution: &Configuration) -> AnyResult<C::Score> {
        self.cost_fn.cost(solution)
    }

    fn generate_trial_solution<R: rand::Rng + ?Sized>(
        &self,
        current_solution: Configuration,
        _current_score: C::Score,
        rng: &mut R,
    ) -> AnyResult<(Configuration, C::Score)> {
        let trial = self.perturbation.perturb(current_solution, rng)?;
        let score = self.cost_fn.cost(&trial)?;
        Ok((trial, score))
    }
}
