use std::time::Duration;

use anyhow::Result as AnyResult;
use clap::Parser;
use gridanneal::{
    Configuration, OptProgress,
    optim::{GreedyDescentOptimizer, LocalSearchOptimizer},
    puzzle::{ANIMAL, NATIONALITY, einstein_model},
};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rand::{RngExt as _, SeedableRng, rngs::StdRng};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Solve Einstein's fish riddle with greedy local search and random restarts.
#[derive(Parser, Debug)]
#[command(name = "einstein")]
struct Args {
    /// Iterations per restart.
    #[arg(long, default_value = "10000")]
    iterations: usize,

    /// Maximum number of restarts from a random configuration.
    #[arg(long, default_value = "300")]
    restarts: usize,

    /// Give up a restart after this many iterations without improvement.
    #[arg(long, default_value = "2000")]
    patience: usize,

    /// Iterations between progress bar updates.
    #[arg(long, default_value = "500")]
    report_interval: usize,

    /// Random seed for reproducibility.
    #[arg(long)]
    seed: Option<u64>,

    /// Time limit per restart in seconds.
    #[arg(long, default_value = "10")]
    time_limit: u64,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn create_pbar(n_iter: u64) -> ProgressBar {
    let pb = ProgressBar::new(n_iter);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(20));
    pb
}

fn main() -> AnyResult<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let model = einstein_model()?;
    let schema = model.cost_fn().schema().clone();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };

    let pb = create_pbar(args.iterations as u64);
    let mut best: Option<(Configuration, usize)> = None;

    for restart in 0..args.restarts {
        pb.reset();
        let mut callback = |op: OptProgress<Configuration, usize>| {
            pb.set_message(format!(
                "restart {restart}, cost {}, accepted {}",
                op.score, op.accepted_count
            ));
            pb.set_position(op.iter as u64);
        };

        let initial = Configuration::random(schema.clone(), &mut rng);
        let optimizer = GreedyDescentOptimizer::new()
            .with_seed(rng.random())
            .with_patience(args.patience)
            .with_report_interval(args.report_interval);
        let (solution, score) = optimizer.run_with_callback(
            &model,
            initial,
            args.iterations,
            Duration::from_secs(args.time_limit),
            &mut callback,
        )?;

        if best.as_ref().is_none_or(|(_, best_score)| score < *best_score) {
            info!(restart, score, "new best configuration");
            best = Some((solution, score));
        }
        if score == 0 {
            break;
        }
    }
    pb.finish_and_clear();

    let Some((solution, score)) = best else {
        println!("no restart was run");
        return Ok(());
    };

    println!("{solution}");
    println!("final cost = {score}");
    if score == 0 {
        let house = solution.column_of(ANIMAL, "fish").unwrap_or_default();
        let row = schema.row_index(NATIONALITY).unwrap_or_default();
        println!("the {} owns the fish", solution.value(row, house));
    } else {
        for violation in model.cost_fn().violations(&solution) {
            println!("violated: {violation}");
        }
    }

    Ok(())
}
