use dialoguer::{Confirm, Input, Select};

use crate::error::{PlanError, Result};
use crate::models::{FoodItem, Macros};

fn parse_number(input: &str) -> Result<f64> {
    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number: '{}'", input.trim())))
}

/// Prompt for the daily calorie target.
pub fn prompt_target_calories() -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Daily calorie target (kcal)")
        .default("2000".to_string())
        .interact_text()?;

    let calories = parse_number(&input)?;
    if !(calories > 0.0) {
        return Err(PlanError::InvalidInput(
            "Calorie target must be positive".to_string(),
        ));
    }
    Ok(calories)
}

/// Prompt for a macro amount in grams; empty input means 0.
fn prompt_grams(label: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!("{} target (g)", label))
        .allow_empty(true)
        .interact_text()?;

    if input.trim().is_empty() {
        return Ok(0.0);
    }
    let grams = parse_number(&input)?;
    if grams < 0.0 {
        return Err(PlanError::InvalidInput(format!("{} must be >= 0", label)));
    }
    Ok(grams)
}

/// Prompt for a full daily macro target.
pub fn prompt_target_macros() -> Result<Macros> {
    let calories = prompt_target_calories()?;
    let protein = prompt_grams("Protein")?;
    let carbs = prompt_grams("Carbs")?;
    let fat = prompt_grams("Fat")?;
    Ok(Macros::new(calories, protein, carbs, fat))
}

/// Ask the user to confirm or pick among ranked fuzzy `candidates` for `query`.
///
/// Returns `None` when there are no candidates or the user declines.
pub fn prompt_food_choice<'a>(
    query: &str,
    candidates: &[&'a FoodItem],
) -> Result<Option<&'a FoodItem>> {
    match candidates {
        [] => {
            println!("No matching food found for '{}'", query.trim());
            Ok(None)
        }
        [food] => {
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", food.name))
                .default(true)
                .interact()?;
            Ok(confirm.then_some(*food))
        }
        _ => {
            let shortlist = &candidates[..candidates.len().min(5)];
            let mut options: Vec<String> = shortlist.iter().map(|f| f.name.clone()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            Ok(shortlist.get(selection).copied())
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
