//! Greedy local search over grids of permutations
//!
//! A [`grid::Configuration`] assigns the values of every category of a
//! [`grid::Schema`] to a fixed number of slots. [`optim::GreedyDescentOptimizer`]
//! repeatedly perturbs a copy of the current configuration and keeps it only
//! when its cost is strictly lower. Costs usually come from a
//! [`constraint::ConstraintSet`], which counts violated clues.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod callback;
pub mod cancel;
pub mod constraint;
pub mod error;
pub mod grid;
mod model;
pub mod optim;
pub mod perturb;
pub mod puzzle;
mod search;
mod time_wrapper;

pub use callback::{OptCallbackFn, OptProgress};
pub use cancel::CancelToken;
pub use constraint::adjacent;
pub use error::SearchError;
pub use grid::{Configuration, Schema};
pub use model::{CostFunction, FnCost, GridModel, OptModel};
pub use search::{search, search_with_callback};
pub use time_wrapper::{Duration, Instant};
