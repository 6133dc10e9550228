//! Headless Skirmish Runner
//!
//! Rolls an encounter for a given location tier, runs it as an AI-driven
//! auto-battle, and prints the full report as JSON or text. With
//! LLM_API_KEY set and --llm, rounds are narrated by the LLM; otherwise
//! the template narrator is used.

use clap::Parser;
use duskhollow::character::CharacterSheet;
use duskhollow::combat::CombatManager;
use duskhollow::core::config::CombatConfig;
use duskhollow::core::types::{DangerTier, TimeOfDay};
use duskhollow::encounter::{generate_encounter, Location};
use duskhollow::events::RecordingSink;
use duskhollow::narrate::{LlmNarrator, Narrator, TemplateNarrator};
use duskhollow::runner::{AutoProvider, CombatRunner};
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

/// Headless Skirmish Runner - seeded auto-battles with JSON output
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Roll an encounter and run it as an AI auto-battle")]
struct Args {
    /// Protagonist name
    #[arg(long, default_value = "Wren")]
    name: String,

    /// Protagonist level
    #[arg(long, default_value_t = 3)]
    level: u32,

    /// Location danger tier: safe, low, medium, high, deadly
    #[arg(long, default_value = "medium")]
    tier: String,

    /// Time of day: morning, afternoon, evening, night
    #[arg(long, default_value = "night")]
    time: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Narrate rounds with the LLM configured via LLM_API_KEY
    #[arg(long)]
    llm: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_tier(s: &str) -> DangerTier {
    match s {
        "safe" => DangerTier::Safe,
        "low" => DangerTier::Low,
        "medium" => DangerTier::Medium,
        "high" => DangerTier::High,
        "deadly" => DangerTier::Deadly,
        other => {
            eprintln!("Unknown tier '{}', defaulting to medium", other);
            DangerTier::Medium
        }
    }
}

fn parse_time(s: &str) -> TimeOfDay {
    match s {
        "morning" => TimeOfDay::Morning,
        "afternoon" => TimeOfDay::Afternoon,
        "evening" => TimeOfDay::Evening,
        "night" => TimeOfDay::Night,
        other => {
            eprintln!("Unknown time '{}', defaulting to night", other);
            TimeOfDay::Night
        }
    }
}

#[tokio::main]
async fn main() -> duskhollow::core::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "duskhollow=debug"
    } else {
        "duskhollow=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = CombatConfig::default();
    let tier = parse_tier(&args.tier);
    let time = parse_time(&args.time);

    let hero = CharacterSheet::adventurer(&args.name, args.level);
    let location = Location::new("Gravemarsh Road", tier);

    // Encounter roll and combat share the run seed so a replay reproduces
    // both the spawn and the fight
    let mut encounter_rng = ChaCha8Rng::seed_from_u64(seed);
    let Some(spec) = generate_encounter(&hero, &location, time, &config, &mut encounter_rng)
    else {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "encounter": null,
                "seed": seed,
            }))?
        );
        return Ok(());
    };

    tracing::info!(
        location = %spec.location,
        enemies = spec.enemies.len(),
        seed,
        "encounter triggered"
    );

    let mut manager = CombatManager::new(config, seed);
    let location_name = spec.location.clone();
    manager.start(hero, spec.into_roster())?;

    let narrator: Box<dyn Narrator> = if args.llm {
        match LlmNarrator::from_env() {
            Ok(llm) => Box::new(llm),
            Err(e) => {
                eprintln!("Warning: LLM narrator unavailable ({}), using templates", e);
                Box::new(TemplateNarrator)
            }
        }
    } else {
        Box::new(TemplateNarrator)
    };

    let mut runner = CombatRunner::new(manager, location_name, narrator).auto_protagonist();
    let mut provider = AutoProvider;
    let mut sink = RecordingSink::default();
    let report = runner.run(&mut provider, &mut sink).await?;

    match args.format.as_str() {
        "text" => {
            println!("Skirmish Result");
            println!("===============");
            println!("Outcome: {:?}", report.result.outcome);
            println!("Rounds: {}", report.result.rounds);
            println!("Seed: {}", report.result.seed);
            println!(
                "Rewards: {} xp, {} gold, {} items",
                report.result.rewards.experience,
                report.result.rewards.gold,
                report.result.rewards.loot.len()
            );
            println!();
            for line in &report.narration {
                println!("{}", line);
            }
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
