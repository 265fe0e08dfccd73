use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use indicatif::{ProgressBar, ProgressStyle};
use myrmex_optimizer::{
    json::types::{FromProblem, JsonSolution},
    parsers::{cvrplib::CvrpLibParser, json::JsonParser, parser::DatasetParser},
    problem::cvrp_problem::CvrpProblem,
    solver::{
        aco::SearchResult,
        solver::Solver,
        solver_params::{AcoParams, DEFAULT_SEED, DepositPolicy, Threads},
    },
};
use tracing::info;

use crate::{file_utils::has_extension, generate::write_file, parsers};

#[derive(Args)]
pub struct OptimizeArgs {
    /// Problem file, `.json` or CVRPLIB `.vrp`
    #[arg(short = 'i', long)]
    input: PathBuf,

    #[command(flatten)]
    params: ParamsArgs,

    /// Write the best solution as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Write the per-iteration convergence history as JSON
    #[arg(long)]
    trace: Option<PathBuf>,
}

/// Colony parameters shared by `optimize` and `optimize-dataset`.
#[derive(Args, Clone)]
pub struct ParamsArgs {
    #[arg(long, default_value_t = 30)]
    ants: usize,

    #[arg(long, short = 'n', default_value_t = 50)]
    iterations: usize,

    /// Pheromone exponent
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// Heuristic exponent
    #[arg(long, default_value_t = 1.0)]
    beta: f64,

    #[arg(long, default_value_t = 0.5)]
    evaporation: f64,

    #[arg(long, default_value_t = 1.0)]
    deposit_constant: f64,

    #[arg(long, default_value_t = 1e-4)]
    tau_min: f64,

    #[arg(long, default_value_t = 10.0)]
    tau_max: f64,

    #[arg(long, default_value_t = 1.0)]
    tau_initial: f64,

    /// Probability of picking the best candidate instead of sampling (q0)
    #[arg(long, default_value_t = 0.0)]
    exploitation: f64,

    /// all-ants, iteration-best or global-best
    #[arg(long, value_parser = parsers::parse_deposit_policy, conflicts_with = "elitist")]
    deposit_policy: Option<DepositPolicy>,

    /// Shorthand for `--deposit-policy iteration-best`
    #[arg(long)]
    elitist: bool,

    /// Stop after this many iterations without improvement
    #[arg(long)]
    stagnation: Option<usize>,

    /// Wall-clock budget, e.g. "30s", "5m", "PT1H30M"
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Worker threads for ant construction, all cores when omitted
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl ParamsArgs {
    pub fn to_params(&self) -> AcoParams {
        AcoParams {
            n_ants: self.ants,
            n_iterations: self.iterations,
            alpha: self.alpha,
            beta: self.beta,
            evaporation_rate: self.evaporation,
            deposit_constant: self.deposit_constant,
            tau_min: self.tau_min,
            tau_max: self.tau_max,
            tau_initial: self.tau_initial,
            exploitation: self.exploitation,
            deposit_policy: self
                .deposit_policy
                .unwrap_or_else(|| DepositPolicy::from_elitist(self.elitist)),
            stagnation_limit: self.stagnation,
            time_limit: self.timeout,
            threads: match self.threads {
                None => Threads::Auto,
                Some(1) => Threads::Single,
                Some(threads) => Threads::Multi(threads),
            },
            seed: self.seed,
        }
    }
}

pub fn load_problem(path: &Path) -> anyhow::Result<CvrpProblem> {
    if has_extension(path, "json") {
        JsonParser.parse(path)
    } else {
        CvrpLibParser.parse(path)
    }
}

pub fn iteration_bar(iterations: usize) -> ProgressBar {
    let bar = ProgressBar::new(iterations as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

pub fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let problem = load_problem(&args.input)
        .with_context(|| format!("Could not load {}", args.input.display()))?;
    info!(
        customers = problem.num_customers(),
        minimum_routes = problem.minimum_routes(),
        "Loaded {}",
        args.input.display()
    );

    let params = args.params.to_params();
    let bar = iteration_bar(params.n_iterations);

    let mut solver = Solver::new(problem, params)?;

    let progress = bar.clone();
    solver.on_iteration(move |trace| {
        progress.inc(1);
        progress.set_message(format!("best = {:.2}", trace.global_best_distance));
    });

    let result = solver.solve()?;
    bar.finish_and_clear();

    info!(
        "Finished: routes = {}, distance = {:.2}, iterations = {}, stop = {:?}, duration = {}",
        result.best.num_routes(),
        result.best.total_distance,
        result.iterations,
        result.stop_reason,
        result.duration
    );

    println!("{}", routes_table(&result, solver.problem()));

    if let Some(output) = args.output {
        let solution = JsonSolution::from_problem(&result, solver.problem());
        write_file(&output, serde_json::to_string_pretty(&solution)?)?;
    }

    if let Some(trace) = args.trace {
        write_file(&trace, serde_json::to_string_pretty(&result.history)?)?;
    }

    Ok(())
}

fn routes_table(result: &SearchResult, problem: &CvrpProblem) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Tractor", "Stops", "Pallets", "Weight", "Distance"]);

    for route in result.best.tractor_routes(problem) {
        let stops = route
            .stops
            .iter()
            .map(|stop| stop.external_id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");

        table.add_row(vec![
            route.tractor,
            stops,
            route.total_pallets.to_string(),
            format!("{:.1}", route.total_weight),
            format!("{:.2}", route.distance),
        ]);
    }

    table
}
