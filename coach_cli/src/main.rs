use chrono::Utc;
use clap::{Parser, Subcommand};
use coach_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "Strength training and nutrition coaching system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a weekly program and nutrition targets from a profile
    Generate {
        #[arg(long, default_value_t = 1)]
        user_id: u64,

        /// male or female
        #[arg(long)]
        sex: String,

        #[arg(long)]
        age: u32,

        #[arg(long)]
        height_cm: f64,

        #[arg(long)]
        weight_kg: f64,

        /// cut, bulk or recomp
        #[arg(long)]
        goal: String,

        #[arg(long)]
        days_per_week: u8,

        #[arg(long)]
        session_minutes: u32,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "intermediate")]
        experience: String,

        /// Available equipment tags, comma separated (config default if omitted)
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<String>,

        /// Active injury tags, comma separated
        #[arg(long, value_delimiter = ',')]
        injuries: Vec<String>,

        /// Load the exercise catalog from a JSON file instead of the built-in pool
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Dry run - show the plan without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a weekly review against the stored program
    Review {
        #[arg(long, default_value_t = 1)]
        user_id: u64,

        /// Planned training completed, 0-100
        #[arg(long)]
        completion_pct: f64,

        #[arg(long)]
        avg_rpe: f64,

        /// 0-10 scale
        #[arg(long)]
        avg_soreness: f64,

        #[arg(long)]
        sleep_hours: f64,

        #[arg(long)]
        weight_start: f64,

        #[arg(long)]
        weight_end: f64,

        /// cut, bulk or recomp
        #[arg(long)]
        goal: String,

        #[arg(long, default_value_t = 0)]
        steps_avg: u32,

        /// Current daily calorie target
        #[arg(long)]
        calories: i64,
    },

    /// List the exercise catalog
    Catalog {
        /// Load the exercise catalog from a JSON file instead of the built-in pool
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Show stored adjustment events for a user
    History {
        #[arg(long, default_value_t = 1)]
        user_id: u64,
    },
}

fn main() {
    coach_core::logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Generate {
            user_id,
            sex,
            age,
            height_cm,
            weight_kg,
            goal,
            days_per_week,
            session_minutes,
            experience,
            equipment,
            injuries,
            catalog,
            dry_run,
        } => {
            let equipment = if equipment.is_empty() {
                config.equipment.available.clone()
            } else {
                equipment
            };
            let profile = UserProfile {
                sex: sex.parse()?,
                age,
                height_cm,
                weight_kg,
                goal: goal.parse()?,
                days_per_week,
                session_minutes,
                experience: experience.parse()?,
                equipment,
                injuries,
            };
            cmd_generate(data_dir, user_id, &profile, &config, catalog, dry_run)
        }
        Commands::Review {
            user_id,
            completion_pct,
            avg_rpe,
            avg_soreness,
            sleep_hours,
            weight_start,
            weight_end,
            goal,
            steps_avg,
            calories,
        } => {
            let input = WeeklyReviewInput {
                user_id,
                train_completion_pct: completion_pct,
                avg_rpe,
                avg_soreness,
                sleep_hours,
                weight_start,
                weight_end,
                goal: goal.parse()?,
                steps_avg,
                calories,
            };
            cmd_review(data_dir, &input)
        }
        Commands::Catalog { file } => cmd_catalog(file),
        Commands::History { user_id } => cmd_history(data_dir, user_id),
    }
}

fn cmd_generate(
    data_dir: PathBuf,
    user_id: u64,
    profile: &UserProfile,
    config: &Config,
    catalog_path: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let custom;
    let catalog = match catalog_path {
        Some(path) => {
            custom = Catalog::load_from(&path)?;
            &custom
        }
        None => get_default_catalog(),
    };
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let plan = generate_plan(catalog, profile, config.nutrition.activity_strategy);
    display_plan(&plan);

    if dry_run {
        println!("\n[Dry run - not saving program]");
        return Ok(());
    }

    let store = FileStore::open(&data_dir)?;
    store.save_program(&plan.to_program(user_id, Utc::now()))?;

    println!("\n✓ Program saved for user {}", user_id);
    Ok(())
}

fn cmd_review(data_dir: PathBuf, input: &WeeklyReviewInput) -> Result<()> {
    let store = FileStore::open(&data_dir)?;
    let outcome = run_weekly_review(&store, input, Utc::now())?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  WEEKLY REVIEW");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Training:  {}", outcome.adjustment.training);
    println!("  Nutrition: {}", outcome.adjustment.nutrition);
    println!();
    println!("  {}", outcome.coach_note);
    println!();
    if outcome.saved {
        println!("✓ Adjustment saved ({})", outcome.created_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

fn cmd_catalog(file: Option<PathBuf>) -> Result<()> {
    let custom;
    let catalog = match file {
        Some(path) => {
            custom = Catalog::load_from(&path)?;
            &custom
        }
        None => get_default_catalog(),
    };
    println!("{} exercises:", catalog.exercises.len());
    for exercise in &catalog.exercises {
        let equipment = if exercise.equipment.is_empty() {
            "bodyweight".to_string()
        } else {
            exercise.equipment.join(", ")
        };
        println!(
            "  {:<30} {:?} / {:?} [{}]",
            exercise.name, exercise.muscle, exercise.class, equipment
        );
    }
    Ok(())
}

fn cmd_history(data_dir: PathBuf, user_id: u64) -> Result<()> {
    let store = FileStore::open(&data_dir)?;
    let events: Vec<_> = read_events(&store.events_path())?
        .into_iter()
        .filter(|e| e.user_id == user_id)
        .collect();

    if events.is_empty() {
        println!("No adjustment events for user {}.", user_id);
        return Ok(());
    }

    for event in events {
        println!(
            "{}  training: {}  nutrition: {:+} kcal",
            event.created_at.format("%Y-%m-%d %H:%M"),
            event.payload.training_action,
            event.payload.nutrition_kcal_delta
        );
        println!("    {}", event.payload.note);
    }
    Ok(())
}

fn display_plan(plan: &PlanResponse) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} PROGRAM", plan.split);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", plan.why_split);
    println!("  {}", plan.why_substitution);

    for day in &plan.days {
        println!();
        println!("  ── {} ──", day.label);
        for prescription in &day.exercises {
            println!(
                "  → {} {}x{} @ RIR {}",
                prescription.exercise, prescription.sets, prescription.reps, prescription.rir
            );
        }
    }

    println!();
    println!("  Key lifts: {}", plan.key_lifts.join(", "));
    println!("  Progression: {}", plan.progression_model.note);
    println!();
    println!(
        "  Nutrition: {} kcal (TDEE {}) | P {}g / F {}g / C {}g",
        plan.calories, plan.tdee, plan.protein_g, plan.fat_g, plan.carb_g
    );
    for meal in &plan.meals {
        println!("    {} - {}", meal.name, meal.items.join(", "));
    }
}
