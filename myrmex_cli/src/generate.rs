use std::path::{Path, PathBuf};

use clap::Subcommand;
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Write the JSON schema of the problem document
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Write the JSON schema of the solution document
    SolutionSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = myrmex_optimizer::json::schema::generate_json_schema()?;
            write_file(&out, schema)?;
        }
        GenerateSubcommands::SolutionSchema { out } => {
            let schema = myrmex_optimizer::json::schema::generate_solution_json_schema()?;
            write_file(&out, schema)?;
        }
    }

    Ok(())
}

pub fn write_file(out: &Path, content: String) -> Result<(), std::io::Error> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, content)?;
    info!("Wrote {}", out.display());

    Ok(())
}
