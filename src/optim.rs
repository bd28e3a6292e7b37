//! Optimization Algorithms

mod base;
mod greedy_descent;

pub use base::LocalSearchOptimizer;
pub use greedy_descent::GreedyDescentOptimizer;
