//! Floorplan generator
//!
//! Prints generated apartments and restaurants as ascii maps or JSON.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fc_core::{Floorplan, GameRng, GenerationConfig, PlanKind, generate};

/// Generate procedural floorplans
#[derive(Parser, Debug)]
#[command(name = "floorcarve")]
#[command(author, version, about = "Carve apartments and restaurants out of an empty grid", long_about = None)]
struct Args {
    /// Floorplan recipe (apartment, restaurant)
    #[arg(short, long)]
    plan: Option<PlanKind>,

    /// Seed for the first floorplan; later ones use the following seeds
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of floorplans to generate
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Attempts per floorplan before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// JSON settings file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep the recipe's orientation instead of rotating at random
    #[arg(long)]
    no_permute: bool,

    /// Print JSON instead of ascii maps
    #[arg(long)]
    json: bool,
}

impl Args {
    fn resolve(&self) -> Result<GenerationConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::load_from_file(path)?,
            None => GenerationConfig::default(),
        };

        if let Some(plan) = self.plan {
            config.plan = plan;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(max_attempts) = self.max_attempts {
            if max_attempts == 0 {
                return Err("--max-attempts must be at least 1".into());
            }
            config.max_attempts = max_attempts;
        }
        if self.no_permute {
            config.permute = false;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn build(config: &GenerationConfig, seed: u64) -> Result<Floorplan, Box<dyn Error>> {
    let plan = generate(config.plan, seed, config.max_attempts)?;
    if config.permute {
        Ok(plan.permuted(&mut GameRng::new(seed)))
    } else {
        Ok(plan)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = args.resolve()?;
    let first_seed = config.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
    info!(plan = %config.plan, first_seed, count = config.count, "generating");

    let mut generated = Vec::new();
    for i in 0..config.count {
        let seed = first_seed.wrapping_add(u64::from(i));
        let plan = build(&config, seed)?;

        if args.json {
            generated.push(json!({ "seed": seed, "plan": config.plan, "floorplan": plan }));
        } else {
            println!("{} (seed {})", config.plan, seed);
            println!("{}", plan);
            println!();
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("floorcarve: {}", e);
            ExitCode::FAILURE
        }
    }
}
