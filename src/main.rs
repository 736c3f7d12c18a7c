use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use flexi_logger::Logger;
use rustdataset::{DataResult, DataSet, Exporter, ImportConfig, Importer, PossibleValues};

#[derive(Parser)]
#[clap(version, about = "Inspect and convert delimited data files")]
enum Cli {
    /// Print the schema and contents of a file
    Inspect {
        path: PathBuf,
        /// TOML file with csv options and an optional schema
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
    /// Re-export a file, optionally dropping columns first
    Export {
        input: PathBuf,
        output: PathBuf,
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Column to drop before writing (repeatable)
        #[clap(short, long)]
        drop: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    match Cli::parse() {
        Cli::Inspect { path, config } => {
            let config = load_config(config.as_deref())?;
            let dataset = import(&path, &config)?;
            for variable in dataset.schema() {
                let values = match dataset.possible_values(variable.name())? {
                    PossibleValues::Unbounded => "unbounded".to_string(),
                    PossibleValues::Count(n) => n.to_string(),
                };
                println!(
                    "{:<16} {:<12} width {:<4} offset {:<4} values {}",
                    variable.name(),
                    variable.kind(),
                    variable.width(),
                    variable.offset(),
                    values
                );
            }
            println!();
            println!("{}", dataset.render::<f64>());
        }
        Cli::Export {
            input,
            output,
            config,
            drop,
        } => {
            let config = load_config(config.as_deref())?;
            let mut dataset = import(&input, &config)?;
            for name in &drop {
                dataset.drop_column(name)?;
            }
            Exporter::<f64>::new(config.csv).write_path(&dataset, &output)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> DataResult<ImportConfig> {
    match path {
        Some(path) => ImportConfig::load(path),
        None => Ok(ImportConfig::default()),
    }
}

fn import(path: &Path, config: &ImportConfig) -> DataResult<DataSet> {
    let importer = Importer::<f64>::new(config.csv.clone());
    match &config.schema {
        Some(schema) => importer.read_with_schema(path, schema.clone()),
        None => importer.read_inferred(path),
    }
}
