use clap::{Parser, ValueEnum};
use sankertain::prelude::*;
use std::fs;
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    Deviation,
    Quantile,
}

/// Traverse an LCA supply chain and write a Plotly Sankey figure
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the database JSON file
    database_path: String,

    /// Key of the activity to assess
    #[arg(short, long)]
    activity: String,

    /// Name of the impact assessment method
    #[arg(short, long)]
    method: String,

    /// Amount of the activity demanded
    #[arg(long, default_value_t = 1.0)]
    amount: f64,

    /// Maximum depth below the root that is expanded
    #[arg(long, default_value_t = 3)]
    max_depth: usize,

    /// Fraction of the total score below which branches are not expanded
    #[arg(long, default_value_t = 0.01)]
    cutoff: f64,

    /// Number of Monte Carlo draws per material flow (deterministic when omitted)
    #[arg(long)]
    monte_carlo: Option<usize>,

    /// Seed for the Monte Carlo random generator
    #[arg(long)]
    seed: Option<u64>,

    /// How uncertainty is drawn on the links
    #[arg(long, value_enum, default_value = "quantile")]
    mode: ModeCli,

    /// Fraction of the root flow below which links are bundled in the diagram
    #[arg(long, default_value_t = 0.05)]
    plot_cutoff: f64,

    /// Do not add emission balancing links
    #[arg(long)]
    no_emissions: bool,

    /// Write the raw traversal result instead of the figure
    #[arg(long)]
    raw: bool,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let total_start = Instant::now();

    // --- 1. Loading ---
    let database = Database::from_file(&cli.database_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to load database '{}': {}",
            cli.database_path, e
        ))
    });
    log::info!(
        "Loaded {} activities from '{}'",
        database.len(),
        cli.database_path
    );

    let mut lca = MatrixLca::new(&database);
    if let Some(seed) = cli.seed {
        lca = lca.with_seed(seed);
    }

    // --- 2. Traversal ---
    let traversal_start = Instant::now();
    let tree = SupplyChainTree::builder(cli.activity.as_str(), &cli.method)
        .options(TraversalOptions {
            amount: cli.amount,
            max_depth: cli.max_depth,
            cutoff: cli.cutoff,
            monte_carlo: cli.monte_carlo,
        })
        .build();
    log::debug!("Traversal options: {:?}", tree.options());
    let result = tree
        .traverse(&database, &lca)
        .unwrap_or_else(|e| exit_with_error(&format!("Traversal failed: {}", e)));
    let traversal_duration = traversal_start.elapsed();

    // --- 3. Output ---
    let json = if cli.raw {
        serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize result: {}", e)))
    } else {
        let options = TransformOptions {
            mode: match cli.mode {
                ModeCli::Deviation => UncertaintyMode::Deviation,
                ModeCli::Quantile => UncertaintyMode::Quantile,
            },
            cutoff: cli.plot_cutoff,
            emissions: !cli.no_emissions,
            ..TransformOptions::default()
        };
        render_sankey(result, &options)
            .and_then(|figure| figure.to_json())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to build figure: {}", e)))
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json).unwrap_or_else(|e| {
                exit_with_error(&format!("Could not write to file '{}': {}", path, e))
            });
            log::info!("Wrote output to '{}'", path);
        }
        None => println!("{}", json),
    }

    log::info!(
        "Traversal took {:?}, total {:?}",
        traversal_duration,
        total_start.elapsed()
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
