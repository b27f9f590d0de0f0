use crate::models::{FoodItem, Macros, Recipe};
use crate::planner::constants::DEVIATION_WARN_KCAL;
use crate::planner::pipeline::PlannedMeals;

fn macro_line(m: &Macros) -> String {
    format!(
        "{:>6.0} kcal | P {:>5.1}g C {:>5.1}g F {:>5.1}g",
        m.calories, m.protein, m.carbs, m.fat
    )
}

/// Display a planned set of days in a formatted table.
pub fn display_meal_plan(planned: &PlannedMeals) {
    if planned.plan.is_empty() {
        println!("No meal plan generated.");
        return;
    }

    println!();
    println!("=== Meal Plan ===");

    let name_width = planned
        .plan
        .days
        .iter()
        .flat_map(|d| d.meals.iter())
        .filter_map(|m| m.recipe_snapshot.as_ref().map(|s| s.name.len()))
        .max()
        .unwrap_or(10);

    for day in &planned.plan.days {
        println!();
        println!("Day {} ({})", day.day_index + 1, day.day_type);

        for slot in &day.meals {
            match &slot.recipe_snapshot {
                Some(snapshot) => println!(
                    "  {:<10} {:<width$} x{:>4.2}  {}",
                    slot.slot_name,
                    snapshot.name,
                    slot.quantity_of_recipe_servings,
                    macro_line(&slot.effective_macros()),
                    width = name_width
                ),
                None => println!("  {:<10} (empty)", slot.slot_name),
            }
        }

        let realized = day.realized_macros();
        println!("  {:<10} {}", "Total", macro_line(&realized));

        if let Some(rec) = planned
            .reconciliations
            .iter()
            .find(|r| r.plan.day_index == day.day_index)
        {
            let deviation = rec.calorie_deviation();
            let flag = if deviation.abs() > DEVIATION_WARN_KCAL {
                "  [off target]"
            } else {
                ""
            };
            println!(
                "  {:<10} {}  ({:+.0} kcal){}",
                "Target",
                macro_line(&rec.target),
                deviation,
                flag
            );
        }
    }

    let total: Macros = planned.plan.days.iter().map(|d| d.realized_macros()).sum();

    println!();
    println!("--- Summary ---");
    println!("Days planned: {}", planned.plan.len());
    println!("Total: {}", macro_line(&total));
    if !planned.partially_filled_days.is_empty() {
        let days: Vec<String> = planned
            .partially_filled_days
            .iter()
            .map(|d| (d + 1).to_string())
            .collect();
        println!(
            "Partially filled days: {} (add more recipes to fill every slot)",
            days.join(", ")
        );
    }
    println!();
}

/// Display the recipe library.
pub fn display_recipe_list(recipes: &[&Recipe], title: &str) {
    if recipes.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, recipes.len());
    println!();

    for recipe in recipes {
        let tags = if recipe.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", recipe.tags.join(", "))
        };
        println!(
            "  {} ({}, {} servings) - per serving {}{}",
            recipe.name,
            recipe.category,
            recipe.servings,
            macro_line(&recipe.per_serving_macros),
            tags
        );
    }

    println!();
}

/// Display the nutrients of a quantity of food.
pub fn display_nutrients(food: &FoodItem, grams: f64, macros: &Macros) {
    println!();
    println!("{} ({} per serving)", food.name, food.serving_size);
    println!("  {:.1} g => {}", grams, macro_line(macros));
    println!();
}
