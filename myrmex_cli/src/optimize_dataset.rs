use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use myrmex_optimizer::{parsers::cvrplib::parse_solution_file, solver::solver::Solver};
use tracing::{info, warn};

use crate::{
    file_utils::read_folder,
    optimize::{ParamsArgs, iteration_bar, load_problem},
};

#[derive(Args)]
pub struct OptimizeDatasetArgs {
    /// A `.vrp` file or a folder of them; `.sol` files next to them are used as reference
    #[arg(short, long)]
    dataset: PathBuf,

    #[command(flatten)]
    params: ParamsArgs,
}

struct DatasetRow {
    name: String,
    routes: usize,
    distance: f64,
    known: Option<f64>,
    duration: jiff::SignedDuration,
}

impl DatasetRow {
    fn gap(&self) -> Option<f64> {
        self.known
            .filter(|known| *known > 0.0)
            .map(|known| (self.distance - known) / known * 100.0)
    }
}

pub fn run(args: OptimizeDatasetArgs) -> Result<(), anyhow::Error> {
    info!("Optimizing dataset {:?}", args.dataset);
    let paths = if args.dataset.is_file() {
        vec![args.dataset]
    } else {
        read_folder(&args.dataset, "vrp")?
    };

    let mut rows = Vec::with_capacity(paths.len());

    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let problem = match load_problem(&path) {
            Ok(problem) => problem,
            Err(error) => {
                warn!("Skipping {}: {error:#}", path.display());
                continue;
            }
        };

        let params = args.params.to_params();
        let bar = iteration_bar(params.n_iterations);
        bar.set_prefix(name.clone());

        let mut solver = Solver::new(problem, params)?;
        let progress = bar.clone();
        solver.on_iteration(move |trace| {
            progress.inc(1);
            progress.set_message(format!("best = {:.2}", trace.global_best_distance));
        });

        let result = match solver.solve() {
            Ok(result) => result,
            Err(error) => {
                bar.abandon();
                warn!("{name}: {error}");
                continue;
            }
        };
        bar.finish_and_clear();

        let row = DatasetRow {
            name,
            routes: result.best.num_routes(),
            distance: result.best.total_distance,
            known: parse_solution_file(path.with_extension("sol")),
            duration: result.duration,
        };

        info!(
            "{}: distance = {:.2}, routes = {}, gap = {}",
            row.name,
            row.distance,
            row.routes,
            format_gap(row.gap())
        );

        rows.push(row);
    }

    println!("{}", summary_table(&rows));

    Ok(())
}

fn format_gap(gap: Option<f64>) -> String {
    gap.map(|gap| format!("{gap:.2}%"))
        .unwrap_or_else(|| String::from("-"))
}

fn summary_table(rows: &[DatasetRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Instance", "Routes", "Distance", "Known", "Gap", "Duration",
    ]);

    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            row.routes.to_string(),
            format!("{:.2}", row.distance),
            row.known
                .map(|known| format!("{known:.2}"))
                .unwrap_or_else(|| String::from("-")),
            format_gap(row.gap()),
            format!("{:.2}s", row.duration.as_secs_f64()),
        ]);
    }

    let gaps = rows.iter().filter_map(DatasetRow::gap).collect::<Vec<_>>();
    if !gaps.is_empty() {
        let average = gaps.iter().sum::<f64>() / gaps.len() as f64;
        table.add_row(vec![
            String::from("average"),
            String::new(),
            String::new(),
            String::new(),
            format!("{average:.2}%"),
            String::new(),
        ]);
    }

    table
}
