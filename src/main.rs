use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lodex::index::stats::show_stats;
use lodex::index::LocationIndex;
use lodex::output;
use lodex::utils::progress::Spinner;
use lodex::utils::{get_config_path, AppConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lodex")]
#[command(about = "Navigate and search hierarchical administrative-unit data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// CSV dataset (overrides the configured dataset)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Config file (defaults to the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ranked free-text search over leaf units
    Search {
        /// Search text
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show the record for a leaf name
    Record {
        /// Leaf unit name
        #[arg(required = true)]
        leaf: Vec<String>,

        /// Show every record sharing the name
        #[arg(short, long)]
        all: bool,
    },
    /// Show the full path of a leaf
    Path {
        /// Leaf unit name
        #[arg(required = true)]
        leaf: Vec<String>,
    },
    /// Show the units above a leaf
    Parent {
        /// Leaf unit name
        #[arg(required = true)]
        leaf: Vec<String>,
    },
    /// List units: top level, or beneath TOP [SECOND [THIRD]]
    List {
        /// Ancestor units, top first
        units: Vec<String>,
    },
    /// List children at any depth of the full input hierarchy
    Children {
        /// Ancestor units, top first
        path: Vec<String>,
    },
    /// Show index statistics
    Stats,
    /// Show the effective configuration
    Config {
        /// Write the configuration file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };
    let config = AppConfig::load_from(&config_path)?;
    let color = !cli.no_color;

    let load = || -> Result<(LocationIndex, PathBuf)> {
        let dataset = resolve_dataset(cli.data.as_deref(), &config, &config_path)?;
        let index = load_index(&dataset, &config)?;
        Ok((index, dataset))
    };

    let found = match &cli.command {
        Commands::Search { query, limit } => {
            let (index, _) = load()?;
            let limit = limit.unwrap_or(config.index.default_limit);
            let results = index.search(&query.join(" "), limit);
            if cli.json {
                output::print_json(&results)?;
            } else {
                output::print_records(&results, color)?;
            }
            !results.is_empty()
        }
        Commands::Record { leaf, all } => {
            let (index, _) = load()?;
            let leaf = leaf.join(" ");
            let records = if *all {
                index.records_named(&leaf)
            } else {
                index.record_by_leaf(&leaf).into_iter().collect()
            };
            if cli.json {
                if *all {
                    output::print_json(&records)?;
                } else {
                    output::print_json(&records.first())?;
                }
            } else {
                output::print_records(&records, color)?;
            }
            !records.is_empty()
        }
        Commands::Path { leaf } => {
            let (index, _) = load()?;
            let path = index.path(&leaf.join(" "));
            if cli.json {
                output::print_json(&path)?;
            } else if let Some(path) = &path {
                println!("{}", path);
            }
            path.is_some()
        }
        Commands::Parent { leaf } => {
            let (index, _) = load()?;
            let parent = index.parent(&leaf.join(" "));
            if cli.json {
                output::print_json(&parent)?;
            } else if let Some(parent) = &parent {
                output::print_parent(parent, slot_labels(&index), color)?;
            }
            parent.is_some()
        }
        Commands::List { units } => {
            let (index, _) = load()?;
            let names = list_units(&index, units)?;
            if cli.json {
                output::print_json(&names)?;
            } else {
                output::print_names(&names)?;
            }
            !names.is_empty()
        }
        Commands::Children { path } => {
            let (index, _) = load()?;
            let names = index.children(path.as_slice());
            if cli.json {
                output::print_json(&names)?;
            } else {
                output::print_names(&names)?;
            }
            !names.is_empty()
        }
        Commands::Stats => {
            let (index, dataset) = load()?;
            if cli.json {
                output::print_json(index.stats())?;
            } else {
                show_stats(&index, Some(dataset.as_path()));
            }
            true
        }
        Commands::Config { init } => {
            return show_config(&config, &config_path, *init, cli.json);
        }
    };

    if found {
        Ok(ExitCode::SUCCESS)
    } else {
        if !cli.json {
            eprintln!("No matching units");
        }
        Ok(ExitCode::FAILURE)
    }
}

fn resolve_dataset(data: Option<&Path>, config: &AppConfig, config_path: &Path) -> Result<PathBuf> {
    match data.or(config.dataset.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => bail!(
            "No dataset given. Pass --data <CSV> or set \"dataset\" in {}",
            config_path.display()
        ),
    }
}

fn load_index(dataset: &Path, config: &AppConfig) -> Result<LocationIndex> {
    let spinner = Spinner::start(&format!("Indexing {}", dataset.display()));
    let result = LocationIndex::open(dataset, &config.index);
    spinner.finish();

    let index = result?;
    info!(
        records = index.len(),
        top_level_units = index.top_level_units().len(),
        "index built"
    );
    Ok(index)
}

fn list_units(index: &LocationIndex, units: &[String]) -> Result<Vec<String>> {
    let names = match units {
        [] => index.top_level_units().to_vec(),
        [top] => index.second_level_units(top),
        [top, second] => index.third_level_units(top, second).to_vec(),
        [top, second, third] => index.leaf_units(top, second, third).to_vec(),
        _ => bail!("list takes at most three units (TOP SECOND THIRD)"),
    };
    Ok(names)
}

/// Level names of the top/second/third slots, for labelling parent output
fn slot_labels(index: &LocationIndex) -> [&str; 3] {
    let schema = index.schema();
    let label = |i: usize| schema.levels.get(i).map(String::as_str).unwrap_or("");
    [label(schema.top), label(schema.second), label(schema.third)]
}

fn show_config(config: &AppConfig, path: &Path, init: bool, json: bool) -> Result<ExitCode> {
    if init && !path.exists() {
        config
            .save_to(path)
            .with_context(|| format!("Failed to initialize config at {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }

    if json {
        output::print_json(config)?;
    } else {
        println!("Config file: {}", path.display());
        println!("{}", serde_json::to_string_pretty(config)?);
    }
    Ok(ExitCode::SUCCESS)
}
