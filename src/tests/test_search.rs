use anyhow::anyhow;

use crate::{Configuration, SearchError, perturb::shuffle_row_fn, search, search_with_callback};

use super::{pairing_cost, pairing_schema, pairing_start};

#[test]
fn test_pairing_scenario_over_many_seeds() {
    for seed in 0..200 {
        let (solution, cost) = search(pairing_start(), pairing_cost, shuffle_row_fn(seed), 1000)
            .unwrap();
        assert_eq!(cost, 0, "seed {seed}");
        assert_eq!(pairing_cost(&solution).unwrap(), 0);
    }
}

#[test]
fn test_seeded_perturbation_is_reproducible() {
    let run = |seed| {
        search(
            Configuration::identity(pairing_schema()),
            |cfg: &Configuration| Ok(cfg.position(0, 0).unwrap_or(0)),
            shuffle_row_fn(seed),
            50,
        )
        .unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_observer_sees_non_increasing_costs() {
    let mut seen = Vec::new();
    let (_, cost) = search_with_callback(
        pairing_start(),
        pairing_cost,
        shuffle_row_fn(1),
        100,
        1,
        |i, current_cost| seen.push((i, current_cost)),
    )
    .unwrap();

    assert_eq!(seen.len(), 100);
    assert_eq!(seen[0].0, 0);
    assert!(seen.windows(2).all(|w| w[1].1 <= w[0].1));
    assert_eq!(seen.last().map(|&(_, c)| c), Some(cost));
    assert!(cost <= 2);
}

#[test]
fn test_errors() {
    let err = search(pairing_start(), pairing_cost, shuffle_row_fn(0), 0).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SearchError>(),
        Some(&SearchError::InvalidIterationBudget(0))
    );

    let broken = Configuration::from_indices(pairing_schema(), vec![vec![0, 1, 2], vec![1, 1, 2]]);
    let err = search(broken, pairing_cost, shuffle_row_fn(0), 10).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SearchError>(),
        Some(SearchError::InvalidConfiguration { row: 1, .. })
    ));

    let err = search(
        pairing_start(),
        pairing_cost,
        |_: Configuration| Err(anyhow!("perturbation failed")),
        10,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "perturbation failed");
    assert!(err.downcast_ref::<SearchError>().is_none());
}
