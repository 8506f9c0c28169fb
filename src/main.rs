use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use taintbench::{catalog, config, issues, validate};

#[derive(Parser)]
#[command(
    name = "taintbench",
    about = "Self-validation and ground-truth comparison for a taint-tracking benchmark"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the startup validation gate: schema, routes, heading uniqueness
    Validate {
        /// Path to config file
        #[arg(short, long, default_value = "taintbench.toml")]
        config: PathBuf,

        /// Catalog definition file (overrides the config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Registered-routes file (overrides the config)
        #[arg(long)]
        routes: Option<PathBuf>,
    },

    /// Compare a findings file against recorded ground truth
    Compare {
        /// SARIF-like findings file (JSON array)
        sarif: PathBuf,

        /// Ground-truth file: one `path:line` location per line
        #[arg(long)]
        ground_truth: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taintbench=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate {
            config,
            catalog,
            routes,
        } => run_validate(config, catalog, routes),
        Command::Compare { sarif, ground_truth } => run_compare(sarif, ground_truth),
    }
}

fn run_validate(
    config_path: PathBuf,
    catalog_override: Option<PathBuf>,
    routes_override: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::Config::load(&config_path).unwrap_or_default();
    let catalog_path = catalog_override.unwrap_or(cfg.gate.catalog);
    let routes_path = routes_override.unwrap_or(cfg.gate.routes);

    let raw = catalog::load_raw(&catalog_path)?;
    let mounts: Vec<validate::routes::RouterMount> = serde_json::from_str(
        &std::fs::read_to_string(&routes_path)
            .with_context(|| format!("Failed to read routes {}", routes_path.display()))?,
    )
    .context("Routes file is not a valid JSON array of router mounts")?;
    let registered = validate::routes::enumerate_routes(&mounts)?;

    match validate::run_startup_gate(&raw, &registered) {
        Ok(catalog) => {
            println!(
                "Catalog valid: {} categories, {} handlers, {} registered routes",
                catalog.categories.len(),
                catalog.iter_handlers().count(),
                registered.len()
            );
            Ok(())
        }
        Err(failure) => {
            eprintln!("[ERROR] {failure} failed. Exit.");
            std::process::exit(failure.exit_code());
        }
    }
}

fn run_compare(sarif_path: PathBuf, ground_truth_path: PathBuf) -> Result<()> {
    let tracker = issues::IssueTracker::new();
    let recorded = std::fs::read_to_string(&ground_truth_path)
        .with_context(|| format!("Failed to read ground truth {}", ground_truth_path.display()))?;
    for entry in recorded.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (path, line) = entry
            .rsplit_once(':')
            .with_context(|| format!("Ground-truth entry {entry:?} is not in path:line format"))?;
        let line: u32 = line
            .parse()
            .with_context(|| format!("Ground-truth entry {entry:?} has a non-numeric line"))?;
        tracker.report_at(path, line);
    }

    let payload = std::fs::read_to_string(&sarif_path)
        .with_context(|| format!("Failed to read findings {}", sarif_path.display()))?;
    let comparison = issues::sarif::compare_sarif(&tracker, &payload)?;
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(())
}
