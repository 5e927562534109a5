//! One-shot prediction from a JSON input file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use infath::config::Config;
use infath::{PredictError, PredictionInput, PredictionResponse, Predictor};

#[derive(Parser, Debug)]
#[command(name = "predict")]
#[command(about = "Predict the value of one land parcel")]
struct Args {
    /// JSON file with the parcel description
    input: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the model, scalers and reference tables (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print engineered features and the final feature vector as well
    #[arg(long)]
    explain: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.artifacts.data_dir = data_dir;
    }

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let input: PredictionInput =
        serde_json::from_str(&content).context("Failed to parse input JSON")?;

    let predictor = Predictor::load(&config.artifacts.paths())?;
    info!("Predicting {} / {}", input.region, input.city);

    let output = if args.explain {
        predictor
            .explain(&input)
            .map(|explanation| serde_json::to_string_pretty(&explanation))
    } else {
        predictor
            .predict(&input)
            .map(|prediction| serde_json::to_string_pretty(&PredictionResponse { prediction }))
    };

    match output {
        Ok(json) => {
            println!("{}", json?);
            Ok(())
        }
        Err(PredictError::Invalid(errors)) => {
            for e in errors.errors() {
                eprintln!("{}: {}", e.field, e.reason);
            }
            anyhow::bail!("Input rejected")
        }
        Err(e) => Err(e.into()),
    }
}
