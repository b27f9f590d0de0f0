use std::fs;
use std::path::Path;

use crate::error::{PlanError, Result};
use crate::models::{FullMealPlan, Macros};
use crate::planner::proposal::ProposedPlan;
use crate::planner::targets::FixedTargets;
use crate::state::library::{LibraryFile, RecipeLibrary};

fn ensure_valid(label: &str, macros: &Macros) -> Result<()> {
    if macros.is_valid() {
        Ok(())
    } else {
        Err(PlanError::InvalidInput(format!(
            "{} has negative or non-finite nutrients",
            label
        )))
    }
}

/// Load the food/recipe library from a JSON file.
///
/// Recipe totals are recomputed from their ingredient snapshots; duplicate
/// ids keep the last occurrence. Negative or non-finite nutrients on a food
/// or an ingredient are rejected.
pub fn load_library<P: AsRef<Path>>(path: P) -> Result<RecipeLibrary> {
    let content = fs::read_to_string(path)?;
    let mut file: LibraryFile = serde_json::from_str(&content)?;
    for food in &file.foods {
        ensure_valid(&format!("food '{}'", food.id), &food.macros())?;
    }
    for recipe in &mut file.recipes {
        for ingredient in &recipe.ingredients {
            ensure_valid(
                &format!("ingredient '{}' of recipe '{}'", ingredient.food_item_id, recipe.id),
                &ingredient.macros(),
            )?;
        }
        recipe.recompute();
    }
    Ok(RecipeLibrary::from_file(file))
}

/// Save the library to a JSON file, sorted by id.
pub fn save_library<P: AsRef<Path>>(path: P, library: &RecipeLibrary) -> Result<()> {
    let json = serde_json::to_string_pretty(&library.to_file())?;
    fs::write(path, json)?;
    Ok(())
}

/// Load per-day-type targets; every present target must be valid.
pub fn load_targets<P: AsRef<Path>>(path: P) -> Result<FixedTargets> {
    let content = fs::read_to_string(path)?;
    let targets: FixedTargets = serde_json::from_str(&content)?;
    for (label, target) in [
        ("normal target", &targets.normal),
        ("low target", &targets.low),
        ("high target", &targets.high),
    ] {
        if let Some(macros) = target {
            ensure_valid(label, macros)?;
        }
    }
    Ok(targets)
}

pub fn load_proposal<P: AsRef<Path>>(path: P) -> Result<ProposedPlan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_plan<P: AsRef<Path>>(path: P, plan: &FullMealPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<FullMealPlan> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Round to two decimals for tabular output.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Write one CSV row per meal slot.
pub fn export_plan_csv<P: AsRef<Path>>(path: P, plan: &FullMealPlan) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "day",
        "day_type",
        "slot",
        "recipe_id",
        "recipe_name",
        "servings",
        "calories",
        "protein",
        "carbs",
        "fat",
    ])?;

    for day in &plan.days {
        for slot in &day.meals {
            let macros = slot.effective_macros();
            let (recipe_id, recipe_name) = match &slot.recipe_snapshot {
                Some(snapshot) => (snapshot.id.as_str(), snapshot.name.as_str()),
                None => ("", ""),
            };
            wtr.write_record([
                day.day_index.to_string(),
                day.day_type.to_string(),
                slot.slot_name.clone(),
                recipe_id.to_string(),
                recipe_name.to_string(),
                format!("{:.2}", slot.quantity_of_recipe_servings),
                format!("{:.1}", round2(macros.calories)),
                format!("{:.1}", round2(macros.protein)),
                format!("{:.1}", round2(macros.carbs)),
                format!("{:.1}", round2(macros.fat)),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
