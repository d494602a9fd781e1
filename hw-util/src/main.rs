use anyhow::{Context, Result};
use gumdrop::Options;
use handwriting::{s, Config, Dataset};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(gumdrop::Options, Debug)]
pub struct Args {
    #[options(help = "Show this message")]
    help: bool,

    #[options(help = "Print the version", short = "V")]
    pub version: bool,

    #[options(help = "Config file location")]
    pub config: Option<PathBuf>,

    #[options(help = "Print the default config file and exit", no_short)]
    pub print_default_config: bool,

    #[options(help = "List labels from the alphabet that have no strokes")]
    pub missing: bool,

    #[options(help = "Write the dataset back out to this file")]
    pub output: Option<PathBuf>,

    #[options(free, help = "Dataset to analyze")]
    pub file: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path().context("finding config directory")?,
    };

    Ok(Config::from_disk(&path))
}

fn summarize(dataset: &Dataset) {
    if dataset.is_empty() {
        println!("{}", s!(NothingCollected));
        return;
    }

    println!(
        "{} labels, {} strokes, {} points",
        dataset.len(),
        dataset.stroke_count(),
        dataset.point_count()
    );

    for (label, drawing) in dataset.iter() {
        match drawing.bounds() {
            Some(bounds) => println!(
                "{label}\t{} strokes\t{} points\t{bounds}",
                drawing.len(),
                drawing.point_count()
            ),
            None => println!("{label}\tempty"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse_args_default_or_exit();

    if args.version {
        println!("Handwriting dataset util version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.print_default_config {
        println!("{}", Config::new().to_ron_string()?);
        return Ok(());
    }

    let file = match &args.file {
        Some(file) => file,
        None => {
            eprintln!("{}", Args::usage());
            std::process::exit(1);
        }
    };

    let dataset = Dataset::load(file).map_err(|err| anyhow::anyhow!(err.message()))?;
    tracing::info!("loaded {} labels from {}", dataset.len(), file.display());
    summarize(&dataset);

    if args.missing {
        let config = load_config(&args)?;
        let missing = dataset.missing(&config.alphabet);
        println!("{} {}", s!(MissingLabels), missing.join(" "));
    }

    if let Some(output) = &args.output {
        let config = load_config(&args)?;
        dataset
            .write(output, config.pretty_export)
            .map_err(|err| anyhow::anyhow!(err.message()))
            .with_context(|| format!("writing {}", output.display()))?;
    }

    Ok(())
}
