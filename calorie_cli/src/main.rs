use calorie_core::progress::{compute_activity_index_with, compute_daily_progress_with};
use calorie_core::score::classify_level_with;
use calorie_core::summary::week_start;
use calorie_core::*;
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kcal")]
#[command(about = "Calorie, water and mood tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, edit or show the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Log, remove or list meals
    Meal {
        #[command(subcommand)]
        action: MealAction,
    },

    /// Save, list or remove meal presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Track water intake
    Water {
        #[command(subcommand)]
        action: WaterAction,
    },

    /// Set today's mood (excellent, good, okay, bad, terrible, none)
    Mood { mood: String },

    /// Show today's progress
    Summary,

    /// Show calories for the last seven days
    Week,

    /// Add today's points to the score (once per day)
    Score,

    /// Export meals to CSV
    Export {
        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// First day to include
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Set biometrics and targets, recomputing the daily calorie target
    Set(ProfileSetArgs),
    /// Show the profile, score and streak
    Show,
}

#[derive(Args)]
struct ProfileSetArgs {
    #[arg(long)]
    name: Option<String>,

    /// male or female
    #[arg(long)]
    gender: String,

    /// Age in years
    #[arg(long)]
    age: u32,

    /// Weight in kg
    #[arg(long)]
    weight: f64,

    /// Height in cm
    #[arg(long)]
    height: f64,

    /// Activity factor (1.2, 1.375, 1.55, 1.725, 1.9) or level name
    #[arg(long)]
    activity: String,

    /// Daily water target in ml
    #[arg(long)]
    water_target: Option<u32>,

    /// Daily steps target
    #[arg(long)]
    steps_target: Option<u32>,
}

#[derive(Subcommand)]
enum MealAction {
    /// Log a meal; nutrition is looked up in foods.json unless --kcal is given
    Add {
        #[arg(long, required_unless_present = "preset")]
        food: Option<String>,

        #[arg(long, required_unless_present = "preset")]
        grams: Option<f64>,

        #[arg(long)]
        kcal: Option<f64>,

        #[arg(long, requires = "kcal")]
        protein: Option<f64>,

        #[arg(long, requires = "kcal")]
        fat: Option<f64>,

        #[arg(long, requires = "kcal")]
        carbs: Option<f64>,

        /// Log every item of a saved or built-in preset instead
        #[arg(long, conflicts_with_all = ["food", "grams", "kcal"])]
        preset: Option<String>,

        /// Time of day (HH:MM), defaults to now
        #[arg(long)]
        time: Option<String>,
    },

    /// Remove a meal by id
    Rm { id: String },

    /// List the day's meals
    List,
}

#[derive(Subcommand)]
enum PresetAction {
    /// Save a preset
    Add {
        #[arg(long)]
        name: String,

        /// breakfast, lunch, snack or dinner
        #[arg(long = "type")]
        meal_type: String,

        /// Item as name:grams:kcal; repeat for each food
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
    /// List built-in and saved presets
    List,
    /// Remove a saved preset by name
    Rm { name: String },
}

#[derive(Subcommand)]
enum WaterAction {
    /// Add water in ml (negative to remove)
    Add {
        #[arg(allow_negative_numbers = true)]
        ml: i64,
    },
    /// Reset today's water to zero
    Reset,
}

/// File locations inside the data directory
struct DataPaths {
    profile: PathBuf,
    meals: PathBuf,
    foods: PathBuf,
    presets: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        Self {
            profile: data_dir.join("profile.json"),
            meals: data_dir.join("meals.jsonl"),
            foods: data_dir.join("foods.json"),
            presets: data_dir.join("presets.json"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    calorie_core::logging::init_with_level(calorie_core::logging::level_for_verbosity(
        cli.verbose,
    ));

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!("Data dir {:?}, today is {}", data_dir, today);

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Set(args) => cmd_profile_set(&paths, args, &config),
            ProfileAction::Show => cmd_profile_show(&paths, today, &config),
        },
        Commands::Meal { action } => match action {
            MealAction::Add {
                food,
                grams,
                kcal,
                protein,
                fat,
                carbs,
                preset,
                time,
            } => match (preset, food, grams) {
                (Some(name), _, _) => cmd_meal_add_preset(&paths, &name, time, today, &config),
                (None, Some(food), Some(grams)) => {
                    let manual = kcal.map(|calories| NutritionFacts {
                        calories,
                        protein_g: protein.unwrap_or(0.0),
                        fat_g: fat.unwrap_or(0.0),
                        carbs_g: carbs.unwrap_or(0.0),
                    });
                    cmd_meal_add(&paths, &food, grams, manual, time, today, &config)
                }
                _ => Err(Error::invalid(
                    "--food and --grams are required unless --preset is given",
                )),
            },
            MealAction::Rm { id } => cmd_meal_rm(&paths, &id),
            MealAction::List => cmd_meal_list(&paths, today),
        },
        Commands::Preset { action } => match action {
            PresetAction::Add {
                name,
                meal_type,
                items,
            } => cmd_preset_add(&paths, &name, &meal_type, &items),
            PresetAction::List => cmd_preset_list(&paths),
            PresetAction::Rm { name } => cmd_preset_rm(&paths, &name),
        },
        Commands::Water { action } => match action {
            WaterAction::Add { ml } => cmd_water(
                &paths,
                ProfileCommand::AddWater {
                    delta_ml: ml,
                    on: today,
                },
                today,
                &config,
            ),
            WaterAction::Reset => {
                cmd_water(&paths, ProfileCommand::ResetWater { on: today }, today, &config)
            }
        },
        Commands::Mood { mood } => cmd_mood(&paths, &mood, today, &config),
        Commands::Summary => cmd_summary(&paths, today, &config),
        Commands::Week => cmd_week(&paths, today),
        Commands::Score => cmd_score(&paths, today, &config),
        Commands::Export { out, from, to } => cmd_export(&paths, &out, from, to),
    }
}

fn require_profile(paths: &DataPaths) -> Result<Profile> {
    Profile::load(&paths.profile)?.ok_or_else(|| {
        Error::NotFound("no profile yet; create one with `kcal profile set`".into())
    })
}

fn cmd_profile_set(paths: &DataPaths, args: ProfileSetArgs, config: &Config) -> Result<()> {
    let biometrics = Biometrics {
        gender: args.gender.parse()?,
        age_years: args.age,
        weight_kg: args.weight,
        height_cm: args.height,
        activity: args.activity.parse()?,
    };

    let policy = &config.scoring;
    let mut created = false;
    let profile = Profile::upsert(&paths.profile, |existing| {
        created = existing.is_none();
        let mut profile = existing.unwrap_or_else(|| Profile::new(None, &config.defaults));

        profile = profile.apply(ProfileCommand::SetBiometrics(biometrics), policy)?;
        if let Some(name) = args.name {
            profile = profile.apply(ProfileCommand::Rename(name), policy)?;
        }
        if let Some(ml) = args.water_target {
            profile = profile.apply(ProfileCommand::SetWaterTarget(ml), policy)?;
        }
        if let Some(steps) = args.steps_target {
            profile = profile.apply(ProfileCommand::SetStepsTarget(steps), policy)?;
        }
        Ok(profile)
    })?;

    println!(
        "✓ Profile {}",
        if created { "created" } else { "updated" }
    );
    println!("  Daily target: {} kcal", profile.daily_target_kcal());
    println!("  Water target: {} ml", profile.water_target_ml());
    Ok(())
}

fn cmd_profile_show(paths: &DataPaths, today: NaiveDate, config: &Config) -> Result<()> {
    let profile = require_profile(paths)?;
    let level = classify_level_with(&config.scoring, profile.score());
    let streak = profile.streak_days_on(today);

    println!();
    println!("  {}", profile.name().unwrap_or("(no name)"));
    if let Some(b) = profile.biometrics() {
        println!(
            "  {}, {} years, {} kg, {} cm",
            b.gender, b.age_years, b.weight_kg, b.height_cm
        );
        println!("  Activity: {}", b.activity);
    }
    println!("  Daily target: {} kcal", profile.daily_target_kcal());
    println!(
        "  Water: {} / {} ml",
        profile.water_ml_on(today),
        profile.water_target_ml()
    );
    println!("  Steps target: {}", profile.steps_target());
    if let Some(mood) = profile.mood_for(today) {
        println!("  Mood: {}", mood);
    }
    println!("  Score: {} ({})", profile.score(), level.label);
    println!("  Streak: {} ({})", streak, streak_message(streak));
    println!();
    Ok(())
}

fn parse_time(time: Option<String>) -> Result<NaiveTime> {
    match time {
        Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
            .map_err(|e| Error::invalid(format!("invalid time '{}': {}", s, e))),
        None => {
            let now = Local::now().time();
            NaiveTime::from_hms_opt(now.hour(), now.minute(), 0)
                .ok_or_else(|| Error::Other("current time out of range".into()))
        }
    }
}

fn cmd_meal_add(
    paths: &DataPaths,
    food: &str,
    grams: f64,
    manual: Option<NutritionFacts>,
    time: Option<String>,
    today: NaiveDate,
    config: &Config,
) -> Result<()> {
    let facts = match manual {
        Some(facts) => facts,
        None => {
            let table = FoodTable::load(&paths.foods)?;
            match table.lookup(food, grams)? {
                Some(facts) => facts,
                None => {
                    let suggestions = table.search(food);
                    let hint = if suggestions.is_empty() {
                        "pass --kcal to enter it manually".to_string()
                    } else {
                        format!("did you mean: {}", suggestions.join(", "))
                    };
                    return Err(Error::NotFound(format!(
                        "no nutrition data for '{}'; {}",
                        food, hint
                    )));
                }
            }
        }
    };

    let meal = MealEntry::new(food, grams, facts, today, parse_time(time)?)?;

    let mut log = JsonlMealLog::new(&paths.meals);
    log.append(&meal)?;
    record_activity(paths, today, config)?;

    println!(
        "✓ Meal logged: {} ({} g, {:.0} kcal)",
        meal.food_name, meal.weight_grams, meal.calories
    );
    println!("  id: {}", meal.id);
    Ok(())
}

fn cmd_meal_add_preset(
    paths: &DataPaths,
    name: &str,
    time: Option<String>,
    today: NaiveDate,
    config: &Config,
) -> Result<()> {
    let preset = PresetStore::new(&paths.presets).find(name)?;
    let meals = preset.to_meals(today, parse_time(time)?)?;

    let mut log = JsonlMealLog::new(&paths.meals);
    for meal in &meals {
        log.append(meal)?;
    }
    record_activity(paths, today, config)?;

    println!(
        "✓ Preset logged: {} ({} items, {:.0} kcal)",
        preset.name,
        meals.len(),
        preset.total_calories()
    );
    for meal in &meals {
        println!("  {}  {}", meal.id, meal.food_name);
    }
    Ok(())
}

/// Logging counts as activity for the streak; skipped until a profile exists
fn record_activity(paths: &DataPaths, today: NaiveDate, config: &Config) -> Result<()> {
    Profile::update_if_present(&paths.profile, |p| {
        p.apply(ProfileCommand::RecordActivity { on: today }, &config.scoring)
    })?;
    Ok(())
}

fn cmd_meal_rm(paths: &DataPaths, id: &str) -> Result<()> {
    let id = uuid::Uuid::parse_str(id.trim())
        .map_err(|e| Error::invalid(format!("invalid meal id '{}': {}", id, e)))?;

    let mut log = JsonlMealLog::new(&paths.meals);
    if !log.remove(id)? {
        return Err(Error::NotFound(format!("no meal with id {}", id)));
    }

    println!("✓ Meal removed");
    Ok(())
}

fn cmd_meal_list(paths: &DataPaths, today: NaiveDate) -> Result<()> {
    let meals = JsonlMealLog::new(&paths.meals).on(today)?;
    if meals.is_empty() {
        println!("No meals logged for {}", today);
        return Ok(());
    }

    println!("Meals for {}", today);
    for meal in &meals {
        println!(
            "  {}  {:<9}  {:<24}  {:>6} g  {:>6.0} kcal  {}",
            meal.time.format("%H:%M"),
            meal.slot(),
            meal.food_name,
            meal.weight_grams,
            meal.calories,
            meal.id
        );
    }
    Ok(())
}

fn cmd_preset_add(paths: &DataPaths, name: &str, meal_type: &str, items: &[String]) -> Result<()> {
    let items = items
        .iter()
        .map(|item| PresetItem::parse(item))
        .collect::<Result<Vec<_>>>()?;
    let preset = MealPreset::new(name, meal_type.parse()?, items)?;
    let total = preset.total_calories();
    let count = preset.items.len();

    PresetStore::new(&paths.presets).add(preset)?;

    println!("✓ Preset saved: {} ({} items, {:.0} kcal)", name.trim(), count, total);
    Ok(())
}

fn cmd_preset_list(paths: &DataPaths) -> Result<()> {
    let saved = PresetStore::new(&paths.presets).load_all()?;

    println!("Built-in presets");
    for preset in builtin_presets() {
        print_preset(preset);
    }
    println!();
    if saved.is_empty() {
        println!("No saved presets");
    } else {
        println!("Saved presets");
        for preset in &saved {
            print_preset(preset);
        }
    }
    Ok(())
}

fn print_preset(preset: &MealPreset) {
    let foods: Vec<&str> = preset.items.iter().map(|i| i.food_name.as_str()).collect();
    println!(
        "  {:<20}  {:<9}  {:>5.0} kcal  {}",
        preset.name,
        preset.meal_type,
        preset.total_calories(),
        foods.join(", ")
    );
}

fn cmd_preset_rm(paths: &DataPaths, name: &str) -> Result<()> {
    if !PresetStore::new(&paths.presets).remove(name)? {
        return Err(Error::NotFound(format!("no saved preset named '{}'", name)));
    }
    println!("✓ Preset removed");
    Ok(())
}

fn cmd_water(
    paths: &DataPaths,
    command: ProfileCommand,
    today: NaiveDate,
    config: &Config,
) -> Result<()> {
    let profile = Profile::update(&paths.profile, |p| p.apply(command, &config.scoring))?;

    let water = compute_water_progress(
        i64::from(profile.water_ml_on(today)),
        i64::from(profile.water_target_ml()),
    )?;
    println!(
        "Water: {} / {} ml ({:.0}%)",
        water.current_ml, water.target_ml, water.percent
    );
    Ok(())
}

fn cmd_mood(paths: &DataPaths, mood: &str, today: NaiveDate, config: &Config) -> Result<()> {
    let mood = match mood.trim().to_lowercase().as_str() {
        "none" | "clear" => None,
        other => Some(other.parse::<Mood>()?),
    };

    Profile::update(&paths.profile, |p| {
        p.apply(ProfileCommand::SetMood { mood, on: today }, &config.scoring)
    })?;

    match mood {
        Some(m) => println!("✓ Mood set to {}", m),
        None => println!("✓ Mood cleared"),
    }
    Ok(())
}

fn cmd_summary(paths: &DataPaths, today: NaiveDate, config: &Config) -> Result<()> {
    let profile = require_profile(paths)?;
    let meals = JsonlMealLog::new(&paths.meals).on(today)?;

    let target = i64::from(profile.daily_target_kcal());
    let water_target = i64::from(profile.water_target_ml());
    let water_ml = i64::from(profile.water_ml_on(today));

    let progress = compute_daily_progress_with(&config.scoring, &meals, target)?;
    let water = compute_water_progress(water_ml, water_target)?;
    let activity = compute_activity_index_with(
        &config.scoring,
        progress.consumed_kcal,
        target,
        water_ml,
        water_target,
        profile.mood_for(today),
    )?;

    println!();
    println!("  Summary for {}", today);
    println!();
    println!(
        "  Calories: {:.0} / {} kcal ({:.0}%)",
        progress.consumed_kcal, target, progress.percent
    );
    if progress.remaining_kcal > 0.0 {
        println!("  Remaining: {:.0} kcal", progress.remaining_kcal);
    } else {
        println!("  Over budget by {:.0} kcal", -progress.remaining_kcal);
    }
    println!("  Status: {}", progress.status);
    println!(
        "  Macros: protein {:.1} g, fat {:.1} g, carbs {:.1} g",
        progress.protein_g, progress.fat_g, progress.carbs_g
    );
    println!("  Meals: {}", progress.meal_count);
    println!(
        "  Water: {} / {} ml ({:.0}%)",
        water.current_ml, water.target_ml, water.percent
    );
    println!("  Activity: {:.0}%", activity);

    if goals_met(progress.consumed_kcal, target, water_ml, water_target) {
        println!();
        println!("  🎉 Goals for the day reached!");
    }
    println!();
    Ok(())
}

fn cmd_week(paths: &DataPaths, today: NaiveDate) -> Result<()> {
    let meals = JsonlMealLog::new(&paths.meals).between(week_start(today), today)?;
    let water_today = Profile::load(&paths.profile)?
        .map(|p| p.water_ml_on(today))
        .unwrap_or(0);

    let summary = weekly_summary(&meals, today, water_today);

    println!();
    for day in &summary.days {
        println!(
            "  {} {}  {:>6.0} kcal  {:>5} ml",
            day.date.format("%a"),
            day.date,
            day.kcal,
            day.water_ml
        );
    }
    println!();
    println!("  Total: {:.0} kcal", summary.total_kcal);
    println!("  Daily average: {} kcal", summary.avg_daily_kcal);
    println!();
    Ok(())
}

fn cmd_score(paths: &DataPaths, today: NaiveDate, config: &Config) -> Result<()> {
    let policy = &config.scoring;
    let mut already_scored = false;
    let mut delta = 0;
    let updated = Profile::update(&paths.profile, |profile| {
        already_scored = profile.last_scored_on() == Some(today);
        delta = profile.pending_daily_score(today, policy);
        profile.apply(ProfileCommand::ApplyDailyScore { on: today }, policy)
    })?;

    if already_scored {
        println!("Score already applied for {}", today);
    } else {
        println!("✓ +{} points today", delta);
    }

    let level = classify_level_with(policy, updated.score());
    println!("  Total: {} ({})", updated.score(), level.label);
    println!("  Streak: {}", streak_message(updated.streak_days_on(today)));
    Ok(())
}

fn cmd_export(
    paths: &DataPaths,
    out: &Path,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let meals = JsonlMealLog::new(&paths.meals).between(
        from.unwrap_or(NaiveDate::MIN),
        to.unwrap_or(NaiveDate::MAX),
    )?;

    let count = export_meals_csv(&meals, out)?;

    println!("✓ Exported {} meals", count);
    println!("  CSV: {}", out.display());
    Ok(())
}
