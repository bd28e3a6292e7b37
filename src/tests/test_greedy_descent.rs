use std::{cell::Cell, time::Duration};

use anyhow::anyhow;
use approx::assert_abs_diff_eq;
use ordered_float::NotNan;

use crate::{
    CancelToken, Configuration, FnCost, GridModel, OptModel, OptProgress, SearchError,
    optim::{GreedyDescentOptimizer, LocalSearchOptimizer},
    perturb::{ShuffleRow, SwapCells},
};

use super::{pairing_model, pairing_schema, pairing_start};

const TIME_LIMIT: Duration = Duration::from_secs(10);

#[test]
fn test_pairing_reaches_zero() {
    let model = pairing_model();
    assert_eq!(model.evaluate_solution(&pairing_start()).unwrap(), 2);

    for seed in 0..100 {
        let opt = GreedyDescentOptimizer::new().with_seed(seed);
        let (solution, score) = opt
            .run(&model, pairing_start(), 1000, TIME_LIMIT)
            .unwrap();
        assert_eq!(score, 0, "seed {seed}");
        assert!(solution.validate().is_ok());
    }
}

#[test]
fn test_scores_are_non_increasing() {
    let model = crate::puzzle::einstein_model().unwrap();
    let initial = Configuration::identity(model.cost_fn().schema().clone());
    let initial_score = model.evaluate_solution(&initial).unwrap();

    let mut scores = Vec::new();
    let mut callback = |op: OptProgress<Configuration, usize>| {
        assert!(op.solution.borrow().validate().is_ok());
        scores.push(op.score);
    };
    let opt = GreedyDescentOptimizer::new().with_seed(3);
    let (_, final_score) = opt
        .run_with_callback(&model, initial, 3000, TIME_LIMIT, &mut callback)
        .unwrap();

    assert_eq!(scores.len(), 3000);
    assert!(scores.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(scores.last(), Some(&final_score));
    assert!(final_score <= initial_score);
}

#[test]
fn test_same_seed_same_result() {
    let model = crate::puzzle::einstein_model().unwrap();
    let initial = Configuration::identity(model.cost_fn().schema().clone());

    let opt = GreedyDescentOptimizer::new().with_seed(42);
    let first = opt.run(&model, initial.clone(), 2000, TIME_LIMIT).unwrap();
    let second = opt.run(&model, initial, 2000, TIME_LIMIT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_zero_budget_is_rejected() {
    let opt = GreedyDescentOptimizer::new();
    let err = opt
        .run(&pairing_model(), pairing_start(), 0, TIME_LIMIT)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SearchError>(),
        Some(&SearchError::InvalidIterationBudget(0))
    );
}

#[test]
fn test_invalid_initial_configuration_is_rejected_before_scoring() {
    let calls = Cell::new(0);
    let model = GridModel::new(
        ShuffleRow,
        FnCost::new(|_: &Configuration| {
            calls.set(calls.get() + 1);
            Ok(0usize)
        }),
    );
    let broken =
        Configuration::from_indices(pairing_schema(), vec![vec![0, 0, 2], vec![0, 1, 2]]);

    let err = GreedyDescentOptimizer::new()
        .run(&model, broken, 10, TIME_LIMIT)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SearchError>(),
        Some(SearchError::InvalidConfiguration { row: 0, .. })
    ));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_cost_error_stops_the_search() {
    let calls = Cell::new(0);
    let model = GridModel::new(
        SwapCells,
        FnCost::new(|_: &Configuration| {
            calls.set(calls.get() + 1);
            if calls.get() > 5 {
                Err(anyhow!("cost function failed"))
            } else {
                Ok(1usize)
            }
        }),
    );

    let err = GreedyDescentOptimizer::new()
        .with_seed(0)
        .run(&model, pairing_start(), 100, TIME_LIMIT)
        .unwrap_err();
    assert_eq!(err.to_string(), "cost function failed");
    assert_eq!(calls.get(), 6);
}

#[test]
fn test_cancelled_token_returns_initial_state() {
    let token = CancelToken::new();
    token.cancel();
    let opt = GreedyDescentOptimizer::new().with_cancel_token(token);

    let mut reported = 0;
    let (solution, score) = opt
        .run_with_callback(
            &pairing_model(),
            pairing_start(),
            1000,
            TIME_LIMIT,
            &mut |_: OptProgress<Configuration, usize>| reported += 1,
        )
        .unwrap();
    assert_eq!(solution, pairing_start());
    assert_eq!(score, 2);
    assert_eq!(reported, 0);
}

#[test]
fn test_time_limit_returns_initial_state() {
    let model = crate::puzzle::einstein_model().unwrap();
    let initial = Configuration::identity(model.cost_fn().schema().clone());

    let mut reported = 0;
    let (solution, score) = GreedyDescentOptimizer::new()
        .with_seed(1)
        .run_with_callback(
            &model,
            initial.clone(),
            1_000_000,
            Duration::ZERO,
            &mut |_: OptProgress<Configuration, usize>| reported += 1,
        )
        .unwrap();
    assert_eq!(solution, initial);
    assert_eq!(score, 9);
    assert_eq!(reported, 0);
}

#[test]
fn test_patience_stops_on_plateau() {
    let model = GridModel::new(ShuffleRow, FnCost::new(|_: &Configuration| Ok(0usize)));
    let opt = GreedyDescentOptimizer::new().with_patience(10);

    let mut iters = Vec::new();
    let mut callback = |op: OptProgress<Configuration, usize>| iters.push(op.iter);
    opt.run_with_callback(&model, pairing_start(), 1000, TIME_LIMIT, &mut callback)
        .unwrap();
    assert_eq!(iters, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_report_interval() {
    let opt = GreedyDescentOptimizer::new().with_report_interval(10);

    let mut iters = Vec::new();
    let mut callback = |op: OptProgress<Configuration, usize>| iters.push(op.iter);
    opt.run_with_callback(&pairing_model(), pairing_start(), 25, TIME_LIMIT, &mut callback)
        .unwrap();
    assert_eq!(iters, vec![0, 10, 20, 24]);
}

#[test]
fn test_real_valued_cost() {
    // squared distance of every value from the slot matching its index
    let model = GridModel::new(
        ShuffleRow,
        FnCost::new(|cfg: &Configuration| {
            let mut total = 0.0;
            for row in 0..cfg.n_rows() {
                for (col, &value) in cfg.row_at(row).iter().enumerate() {
                    total += 0.5 * (col as f64 - value as f64).powi(2);
                }
            }
            Ok(NotNan::new(total)?)
        }),
    );

    let opt = GreedyDescentOptimizer::new().with_seed(11);
    let (solution, score) = opt
        .run(&model, pairing_start(), 2000, TIME_LIMIT)
        .unwrap();
    assert_abs_diff_eq!(0.0, score.into_inner(), epsilon = 1e-12);
    assert_eq!(solution, Configuration::identity(pairing_schema()));
}
