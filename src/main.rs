use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use macro_meal_planner_rs::cli::{Cli, Command, PlanArgs};
use macro_meal_planner_rs::error::{PlanError, Result};
use macro_meal_planner_rs::interface::{
    display_meal_plan, display_nutrients, display_recipe_list, prompt_food_choice,
    prompt_target_calories, prompt_target_macros, prompt_yes_no,
};
use macro_meal_planner_rs::models::{DayType, DietProtocol, FoodItem, FullMealPlan, Macros};
use macro_meal_planner_rs::planner::{nutrients_for_quantity, plan_meals, FixedTargets, PlanOptions};
use macro_meal_planner_rs::state::{
    export_plan_csv, load_library, load_plan, load_proposal, load_targets, save_library, save_plan,
    RecipeLibrary,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan(args) => cmd_plan(&cli.file, &args),
        Command::Nutrients { food, grams } => cmd_nutrients(&cli.file, &food, grams),
        Command::Recipes { protocol } => cmd_recipes(&cli.file, protocol.as_deref()),
        Command::AddIngredient {
            recipe,
            food,
            grams,
        } => cmd_add_ingredient(&cli.file, &recipe, &food, grams),
    }
}

fn open_library(file_path: &str) -> Result<Option<RecipeLibrary>> {
    let path = Path::new(file_path);
    if !path.exists() {
        eprintln!("Library file not found: {}", file_path);
        eprintln!("Please ensure meal_library.json exists or pass --file.");
        return Ok(None);
    }
    load_library(path).map(Some)
}

fn parse_protocol(value: &str) -> Result<DietProtocol> {
    value.parse().map_err(PlanError::InvalidInput)
}

/// Targets from `--targets`, or from the macro flags. Missing calories are
/// prompted for; with no flags at all the full target is prompted for.
fn resolve_targets(args: &PlanArgs) -> Result<FixedTargets> {
    if let Some(path) = &args.targets {
        return load_targets(path);
    }

    if args.calories.is_none()
        && args.protein.is_none()
        && args.carbs.is_none()
        && args.fat.is_none()
    {
        return Ok(FixedTargets::uniform(prompt_target_macros()?));
    }

    let calories = match args.calories {
        Some(c) if c > 0.0 => c,
        Some(_) => {
            return Err(PlanError::InvalidInput(
                "Calorie target must be positive".to_string(),
            ));
        }
        None => prompt_target_calories()?,
    };

    Ok(FixedTargets::uniform(Macros::new(
        calories,
        args.protein.unwrap_or(0.0),
        args.carbs.unwrap_or(0.0),
        args.fat.unwrap_or(0.0),
    )))
}

/// Generate and display a meal plan.
fn cmd_plan(file_path: &str, args: &PlanArgs) -> Result<()> {
    let Some(library) = open_library(file_path)? else {
        return Ok(());
    };

    let protocol = parse_protocol(&args.protocol)?;
    let compliant = library.compliant_recipes(protocol);
    println!(
        "Loaded {} recipes, {} compliant with {:?}",
        library.recipe_count(),
        compliant.len(),
        protocol
    );

    let plan = match &args.from {
        Some(path) => load_plan(path)?,
        None => {
            if args.days == 0 || args.meals == 0 {
                return Err(PlanError::InvalidInput(
                    "Days and meals must both be at least 1".to_string(),
                ));
            }
            let day_types = args
                .day_types
                .iter()
                .map(|s| s.parse::<DayType>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(PlanError::InvalidInput)?;
            FullMealPlan::skeleton(args.days, args.meals, &day_types)
        }
    };

    let targets = resolve_targets(args)?;
    let proposal = args.proposal.as_deref().map(load_proposal).transpose()?;

    let mut options = PlanOptions::new(&targets);
    options.protocol = protocol;
    options.user_weight_kg = args.weight;
    if let Some(proposal) = &proposal {
        options.proposer = Some(proposal);
    }

    let planned = plan_meals(&plan, &compliant, &options)?;
    display_meal_plan(&planned);

    if let Some(out) = &args.out {
        save_plan(out, &planned.plan)?;
        println!("Plan saved to {}", out);
    }
    if let Some(csv_path) = &args.csv {
        export_plan_csv(csv_path, &planned.plan)?;
        println!("Plan exported to {}", csv_path);
    }

    Ok(())
}

/// Resolve a food by exact name, otherwise ask the user to confirm or pick
/// among fuzzy matches.
fn choose_food<'a>(library: &'a RecipeLibrary, query: &str) -> Result<Option<&'a FoodItem>> {
    if let Some(food) = library.find_food(query) {
        return Ok(Some(food));
    }
    prompt_food_choice(query, &library.fuzzy_matches(query))
}

fn cmd_nutrients(file_path: &str, query: &str, grams: f64) -> Result<()> {
    let Some(library) = open_library(file_path)? else {
        return Ok(());
    };

    let Some(food) = choose_food(&library, query)? else {
        return Err(PlanError::FoodNotFound(query.to_string()));
    };

    match nutrients_for_quantity(food, grams) {
        Some(macros) => display_nutrients(food, grams, &macros),
        None => println!(
            "Cannot compute nutrients for '{}' (serving size '{}')",
            food.name, food.serving_size
        ),
    }
    Ok(())
}

fn cmd_recipes(file_path: &str, protocol: Option<&str>) -> Result<()> {
    let Some(library) = open_library(file_path)? else {
        return Ok(());
    };

    match protocol {
        Some(value) => {
            let protocol = parse_protocol(value)?;
            let compliant = library.compliant_recipes(protocol);
            let refs: Vec<_> = compliant.iter().collect();
            display_recipe_list(&refs, &format!("Recipes ({:?})", protocol));
        }
        None => display_recipe_list(&library.all_recipes(), "Recipes"),
    }
    Ok(())
}

fn cmd_add_ingredient(file_path: &str, recipe_id: &str, query: &str, grams: f64) -> Result<()> {
    let Some(mut library) = open_library(file_path)? else {
        return Ok(());
    };

    let food_id = match choose_food(&library, query)? {
        Some(food) => food.id.clone(),
        None => return Err(PlanError::FoodNotFound(query.to_string())),
    };

    library.add_ingredient(recipe_id, &food_id, grams)?;

    if let Some(recipe) = library.get_recipe(recipe_id) {
        println!(
            "{} now has {} ingredients, {:.0} kcal per serving",
            recipe.name,
            recipe.ingredients.len(),
            recipe.per_serving_macros.calories
        );
    }

    if prompt_yes_no("Save updated library?", true)? {
        save_library(file_path, &library)?;
        println!("Library saved.");
    }
    Ok(())
}
