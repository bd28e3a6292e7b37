//! Callback of Optimization Iteration

use std::{cell::RefCell, rc::Rc};

/// OptProgress expresses Optimization Progress that is passed to a [`OptCallbackFn`]
#[derive(Debug, Clone)]
pub struct OptProgress<S, SC> {
    /// current iteration step, starting from 0
    pub iter: usize,
    /// number of accepted transitions
    pub accepted_count: usize,
    /// current state, which is also the best state seen so far
    pub solution: Rc<RefCell<S>>,
    /// score of the current state
    pub score: SC,
}

impl<S, SC: Ord> OptProgress<S, SC> {
    /// constuctor of OptProgress
    pub fn new(iter: usize, accepted_count: usize, solution: Rc<RefCell<S>>, score: SC) -> Self {
        Self {
            iter,
            accepted_count,
            solution,
            score,
        }
    }
}

/// OptCallbackFn is a trait of a callback function for optimization
/// Typical usage is to show progress bar and save current result to the file
///
/// Example
///
/// ```rust
/// let pb = ProgressBar::new(n_iter);
/// let mut callback = |op: OptProgress<Configuration, usize>| {
///     pb.set_message(format!("best score {}, accepted {}", op.score, op.accepted_count));
///     pb.set_position(op.iter as u64);
/// };
/// ```
pub trait OptCallbackFn<S, SC: PartialOrd>: FnMut(OptProgress<S, SC>) {}

impl<T: FnMut(OptProgress<S, SC>), S, SC: PartialOrd> OptCallbackFn<S, SC> for T {}
