//! heredity CLI: posterior gene and trait distributions for a pedigree CSV.

use clap::Parser;
use heredity::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "heredity")]
#[command(about = "Exact gene and trait inference over a family tree")]
#[command(version)]
struct Cli {
    /// Pedigree CSV with name, mother, father and trait columns
    data: PathBuf,

    /// JSON file overriding the default model parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Spread enumeration over all cores
    #[arg(long)]
    parallel: bool,

    /// Skip zero-probability hypotheses
    #[arg(long)]
    prune: bool,

    /// Refuse pedigrees larger than this
    #[arg(long, default_value = "20")]
    max_people: usize,

    /// Log progress at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: &Cli) -> Result<()> {
    let params = match &cli.params {
        Some(path) => {
            let params = ModelParameters::from_path(path)?;
            if params != ModelParameters::default() {
                info!(path = %path.display(), "using non-default model parameters");
            }
            params
        }
        None => ModelParameters::default(),
    };

    let mut population = Population::new();
    population.observe(CsvBuilder::new().from_reader(Box::new(File::open(&cli.data)?))?)?;
    let pedigree = Pedigree::new(population)?;

    let mut config = InferenceConfig::new();
    config
        .parallel(cli.parallel)
        .prune_zero(cli.prune)
        .max_people(cli.max_people);
    let (posteriors, _) = Inference::with_config(params, config)?.run(&pedigree)?;

    print!("{}", posteriors);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
