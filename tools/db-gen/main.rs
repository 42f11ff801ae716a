use ahash::AHashMap;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sankertain::prelude::*;
use std::fs;

/// A CLI tool to generate layered supply-chain databases for sankertain
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_database.json")]
    output: String,

    /// Number of supply-chain tiers below the final product
    #[arg(long, default_value_t = 4)]
    layers: usize,

    /// Number of activities per tier
    #[arg(long, default_value_t = 5)]
    width: usize,

    /// Number of inputs each activity takes from the tier below
    #[arg(long, default_value_t = 3)]
    fan_in: usize,

    /// Seed for reproducible databases
    #[arg(long)]
    seed: Option<u64>,
}

const FLOWS: [(&str, f64); 3] = [("co2", 1.0), ("ch4", 28.0), ("n2o", 265.0)];
const LOCATIONS: [&str; 6] = ["DE", "FR", "CN", "US", "BR", "GLO"];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.width == 0 || cli.fan_in > cli.width {
        eprintln!(
            "Error: --fan-in ({}) must not exceed a non-zero --width ({})",
            cli.fan_in, cli.width
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let definition = generate_database(&mut rng, cli.layers, cli.width, cli.fan_in);
    log::info!(
        "Generated {} activities over {} tiers",
        definition.activities.len(),
        cli.layers + 1
    );

    let json_output = serde_json::to_string_pretty(&definition).unwrap_or_else(|e| {
        eprintln!("Error: failed to serialize database: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = fs::write(&cli.output, json_output) {
        eprintln!("Error: could not write '{}': {}", cli.output, e);
        std::process::exit(1);
    }

    println!("Successfully generated and saved database to '{}'", cli.output);
}

fn key(layer: usize, index: usize) -> ActivityKey {
    ActivityKey::new(format!("t{}-a{}", layer, index))
}

/// Tier 0 holds a single final product; every other tier `width` intermediates.
fn generate_database(
    rng: &mut StdRng,
    layers: usize,
    width: usize,
    fan_in: usize,
) -> DatabaseDefinition {
    let mut activities = vec![generate_activity(rng, 0, 0, layers, width, fan_in)];
    for layer in 1..=layers {
        for index in 0..width {
            activities.push(generate_activity(rng, layer, index, layers, width, fan_in));
        }
    }

    let factors: AHashMap<ActivityKey, f64> = FLOWS
        .iter()
        .map(|(flow, factor)| (ActivityKey::from(*flow), *factor))
        .collect();

    DatabaseDefinition {
        activities,
        methods: vec![MethodDefinition {
            name: "gwp100".to_string(),
            factors,
        }],
    }
}

fn generate_activity(
    rng: &mut StdRng,
    layer: usize,
    index: usize,
    layers: usize,
    width: usize,
    fan_in: usize,
) -> ActivityDefinition {
    let own = key(layer, index);
    let mut exchanges = Vec::new();

    // Some activities produce batches instead of single units.
    if rng.gen_bool(0.3) {
        exchanges.push(ExchangeDefinition {
            input: own.clone(),
            output: None,
            amount: rng.gen_range(1.0..5.0_f64).round(),
            kind: ExchangeKind::Production,
            uncertainty: None,
        });
    }

    if layer < layers {
        let mut suppliers: Vec<usize> = (0..width).collect();
        for _ in 0..fan_in {
            let supplier = suppliers.swap_remove(rng.gen_range(0..suppliers.len()));
            let amount = rng.gen_range(0.05..2.0);
            exchanges.push(ExchangeDefinition {
                input: key(layer + 1, supplier),
                output: None,
                amount,
                kind: ExchangeKind::Technosphere,
                uncertainty: Some(Uncertainty::Lognormal {
                    sigma: rng.gen_range(0.05..0.5),
                }),
            });
        }
    }

    for (flow, _) in FLOWS {
        if rng.gen_bool(0.6) {
            let amount = rng.gen_range(0.01..1.0);
            exchanges.push(ExchangeDefinition {
                input: ActivityKey::from(flow),
                output: None,
                amount,
                kind: ExchangeKind::Biosphere,
                uncertainty: Some(Uncertainty::Normal {
                    std_dev: amount * rng.gen_range(0.05..0.3),
                }),
            });
        }
    }

    ActivityDefinition {
        key: own,
        name: format!("product {} of tier {}", index, layer),
        location: LOCATIONS[rng.gen_range(0..LOCATIONS.len())].to_string(),
        unit: Some("kg".to_string()),
        exchanges,
    }
}
