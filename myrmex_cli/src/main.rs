use clap::{Parser, Subcommand};

use mimalloc::MiMalloc;

use crate::{
    generate::GenerateSubcommands, optimize::OptimizeArgs, optimize_dataset::OptimizeDatasetArgs,
};

mod file_utils;
mod generate;
mod optimize;
mod optimize_dataset;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single problem file (JSON document or CVRPLIB instance)
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Solve every CVRPLIB instance of a folder and compare against known solutions
    OptimizeDataset {
        #[command(flatten)]
        args: OptimizeDatasetArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(args)?,
        Some(Commands::OptimizeDataset { args }) => optimize_dataset::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
