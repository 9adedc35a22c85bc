use calis_core::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calispro")]
#[command(about = "Calisthenics progression and workout generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate today's workout (default)
    Plan {
        /// Skill ladder to focus on (e.g. handstand, l_sit, front_lever)
        #[arg(long)]
        skill: Option<String>,

        /// Manual difficulty override (beginner, intermediate, advanced)
        #[arg(long)]
        level: Option<Level>,

        /// Available equipment, comma separated; overrides config
        #[arg(long, value_delimiter = ',')]
        equipment: Option<Vec<String>>,

        /// Dry run - show the plan without saving it
        #[arg(long)]
        dry_run: bool,

        /// Seed for reproducible tie-breaking
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Log a completed workout
    Log {
        /// Entries as ID=VALUE[:RPE[:met|missed]], e.g. push_up=12:3:met
        #[arg(required_unless_present = "skipped")]
        entries: Vec<String>,

        /// Workout-level RPE (1-5), used where an entry omits its own
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rpe: Option<u8>,

        /// Mark the whole workout as having missed its goals
        #[arg(long)]
        goal_failed: bool,

        /// Record a skipped day instead of a completed workout
        #[arg(long, conflicts_with_all = ["entries", "rpe", "goal_failed"])]
        skipped: bool,
    },

    /// Show the composite readiness score and its breakdown
    Readiness,

    /// Show the current stage for one skill, or for all skills
    Stage {
        /// Skill ladder to inspect; omit for all
        skill: Option<String>,
    },

    /// Show which locked prerequisites block the most content
    UnlockKeys,
}

fn main() -> Result<()> {
    calis_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let catalog = build_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    match cli.command {
        Some(Commands::Plan {
            skill,
            level,
            equipment,
            dry_run,
            seed,
        }) => cmd_plan(
            &catalog, data_dir, date, skill, level, equipment, dry_run, seed, &config,
        ),
        Some(Commands::Log {
            entries,
            rpe,
            goal_failed,
            skipped,
        }) => cmd_log(data_dir, date, entries, rpe, goal_failed, skipped),
        Some(Commands::Readiness) => cmd_readiness(&catalog, data_dir, date),
        Some(Commands::Stage { skill }) => cmd_stage(&catalog, data_dir, date, skill),
        Some(Commands::UnlockKeys) => cmd_unlock_keys(&catalog, data_dir, date),
        None => cmd_plan(
            &catalog, data_dir, date, None, None, None, false, None, &config,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    catalog: &Catalog,
    data_dir: PathBuf,
    date: NaiveDate,
    skill: Option<String>,
    level: Option<Level>,
    equipment_override: Option<Vec<String>>,
    dry_run: bool,
    seed: Option<u64>,
    config: &Config,
) -> Result<()> {
    let store = DataStore::new(&data_dir);
    let history = build_history(catalog, &store.read_workouts()?, date);

    let equipment_inputs =
        equipment_override.unwrap_or_else(|| config.equipment.available.clone());
    let available = equipment::resolve(&equipment_inputs);

    let target_skill = skill.or_else(|| config.training.target_skill.clone());

    let request = GenerationRequest {
        target_skill: target_skill.as_deref(),
        equipment: &available,
        reference_date: date,
        level,
    };

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let plan = generate(catalog, &history, &request, &mut rng)?;
    display_plan(&plan);

    if dry_run {
        println!("\n[Dry run - not saving plan]");
        return Ok(());
    }

    store.append_plan(&PlanRecord {
        id: uuid::Uuid::new_v4(),
        date,
        status: WorkoutStatus::Pending,
        plan,
    })?;
    println!("\n✓ Plan saved!");

    Ok(())
}

fn cmd_log(
    data_dir: PathBuf,
    date: NaiveDate,
    entries: Vec<String>,
    rpe: Option<u8>,
    goal_failed: bool,
    skipped: bool,
) -> Result<()> {
    let store = DataStore::new(&data_dir);

    let record = if skipped {
        WorkoutRecord {
            id: uuid::Uuid::new_v4(),
            date,
            status: WorkoutStatus::Skipped,
            rpe: None,
            goal_met: None,
            exercises: vec![],
        }
    } else {
        let exercises: Result<Vec<LoggedExercise>> =
            entries.iter().map(|e| parse_entry(e)).collect();
        WorkoutRecord {
            id: uuid::Uuid::new_v4(),
            date,
            status: WorkoutStatus::Completed,
            rpe,
            goal_met: goal_failed.then_some(false),
            exercises: exercises?,
        }
    };

    store.append_workout(&record)?;

    if skipped {
        println!("✓ Skipped day recorded for {}", date);
    } else {
        println!(
            "✓ Workout logged for {} ({} exercises)",
            date,
            record.exercises.len()
        );
    }
    Ok(())
}

/// Parse one log entry of the form `ID=VALUE[:RPE[:met|missed]]`.
fn parse_entry(raw: &str) -> Result<LoggedExercise> {
    let (id, rest) = raw
        .split_once('=')
        .ok_or_else(|| Error::Other(format!("Invalid entry '{}', expected ID=VALUE", raw)))?;
    if id.is_empty() {
        return Err(Error::Other(format!("Invalid entry '{}': empty id", raw)));
    }

    let mut parts = rest.split(':');
    let value: u32 = parts
        .next()
        .unwrap_or("")
        .parse()
        .map_err(|_| Error::Other(format!("Invalid value in entry '{}'", raw)))?;

    let rpe = match parts.next() {
        Some(p) => Some(
            p.parse::<u8>()
                .ok()
                .filter(|r| (1..=5).contains(r))
                .ok_or_else(|| Error::Other(format!("Invalid RPE in entry '{}'", raw)))?,
        ),
        None => None,
    };

    let goal_met = match parts.next() {
        Some("met") => Some(true),
        Some("missed") => Some(false),
        Some(other) => {
            return Err(Error::Other(format!(
                "Invalid goal flag '{}' in entry '{}', expected met or missed",
                other, raw
            )))
        }
        None => None,
    };

    Ok(LoggedExercise {
        exercise_id: id.to_string(),
        performed_value: Some(value),
        prescribed_value: None,
        rpe,
        goal_met,
    })
}

fn cmd_readiness(catalog: &Catalog, data_dir: PathBuf, date: NaiveDate) -> Result<()> {
    let store = DataStore::new(&data_dir);
    let history = build_history(catalog, &store.read_workouts()?, date);
    let score = readiness_score(catalog, &history, date);

    println!("\nReadiness as of {}", date);
    println!("─────────────────────────────────────────");
    println!("  Push:   {:>3}", score.breakdown.push);
    println!("  Pull:   {:>3}", score.breakdown.pull);
    println!("  Legs:   {:>3}", score.breakdown.legs);
    println!("  Core:   {:>3}", score.breakdown.core);
    println!("  Skills: {:>3}", score.breakdown.skills);
    println!("─────────────────────────────────────────");
    println!("  Total:  {:>3} / 100", score.total_score);
    Ok(())
}

fn cmd_stage(
    catalog: &Catalog,
    data_dir: PathBuf,
    date: NaiveDate,
    skill: Option<String>,
) -> Result<()> {
    let store = DataStore::new(&data_dir);
    let history = build_history(catalog, &store.read_workouts()?, date);

    let targets = match skill {
        Some(s) => vec![s],
        None => skills(catalog),
    };

    for skill in targets {
        match current_stage(catalog, &skill, &history) {
            Some(stage) => {
                println!(
                    "{}: {} ({}, difficulty {})",
                    skill, stage.name, stage.id, stage.difficulty_score
                );
            }
            None => {
                println!("{}: no open rung - rotate or unlock prerequisites", skill);
            }
        }
    }
    Ok(())
}

fn cmd_unlock_keys(catalog: &Catalog, data_dir: PathBuf, date: NaiveDate) -> Result<()> {
    let store = DataStore::new(&data_dir);
    let history = build_history(catalog, &store.read_workouts()?, date);
    let mastered = mastered_set(catalog, &history);

    let keys = find_unlock_keys(catalog, &mastered);
    if keys.is_empty() {
        println!("Nothing is locked - every exercise is reachable.");
        return Ok(());
    }

    println!("\nMaster these to unlock the most content:");
    for key in keys {
        let name = catalog
            .get(&key.exercise_id)
            .map(|ex| ex.name.as_str())
            .unwrap_or(key.exercise_id.as_str());
        println!(
            "  {} ({}) - unlocks {} exercise{}",
            name,
            key.exercise_id,
            key.unlock_count,
            if key.unlock_count == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

fn display_plan(plan: &WorkoutPlan) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.name.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} (readiness {})", plan.description, plan.readiness_score);
    println!();

    for ex in &plan.exercises {
        let slot = match ex.slot {
            SlotKind::Skill => "skill",
            SlotKind::Strength => "strength",
            SlotKind::Core => "core",
            SlotKind::Accessory => "accessory",
        };
        println!(
            "  → [{}] {}: {} x {} ({}, difficulty {})",
            slot, ex.name, ex.sets, ex.target, ex.muscle_group, ex.difficulty_score
        );
    }
}
