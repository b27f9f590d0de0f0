use assert_float_eq::*;

use macro_meal_planner_rs::models::{FoodItem, Macros, Recipe, RecipeCategory, RecipeIngredient};
use macro_meal_planner_rs::planner::{
    aggregate_total, nutrients_for_quantity, parse_serving_size_to_grams, per_serving,
};

fn make_food(id: &str, cal: f64, p: f64, c: f64, f: f64, serving: &str) -> FoodItem {
    FoodItem {
        id: id.to_string(),
        name: id.to_string(),
        calories: cal,
        protein: p,
        carbs: c,
        fat: f,
        serving_size: serving.to_string(),
    }
}

#[test]
fn test_serving_size_parsing() {
    assert_eq!(parse_serving_size_to_grams("100 g"), Some(100.0));
    assert_eq!(parse_serving_size_to_grams("1 slice (28g)"), Some(28.0));
    assert_eq!(parse_serving_size_to_grams("1 cup (240 ml)"), Some(240.0));
    assert_eq!(parse_serving_size_to_grams("a handful"), None);
}

#[test]
fn test_nutrients_scale_linearly() {
    let rice = make_food("rice", 130.0, 2.7, 28.0, 0.3, "100 g");

    let one = nutrients_for_quantity(&rice, 75.0).unwrap();
    let two = nutrients_for_quantity(&rice, 150.0).unwrap();

    assert_float_absolute_eq!(one.calories, 97.5, 1e-9);
    assert_float_absolute_eq!(two.calories, one.calories * 2.0, 1e-9);
    assert_float_absolute_eq!(two.carbs, one.carbs * 2.0, 1e-9);
    assert_float_absolute_eq!(two.protein, 4.05, 1e-9);
}

#[test]
fn test_millilitre_serving_treated_as_grams() {
    let milk = make_food("milk", 61.0, 3.2, 4.8, 3.3, "250 ml");
    let m = nutrients_for_quantity(&milk, 500.0).unwrap();
    assert_float_absolute_eq!(m.calories, 122.0, 1e-9);
}

#[test]
fn test_aggregate_then_per_serving() {
    let oats = make_food("oats", 380.0, 13.0, 67.0, 7.0, "100 g");
    let banana = make_food("banana", 105.0, 1.3, 27.0, 0.4, "118 g");

    let ingredients = vec![
        RecipeIngredient::from_food(&oats, 80.0).unwrap(),
        RecipeIngredient::from_food(&banana, 118.0).unwrap(),
    ];

    let total = aggregate_total(&ingredients);
    assert_float_absolute_eq!(total.calories, 304.0 + 105.0, 1e-9);

    let half = per_serving(total, 2);
    assert_float_absolute_eq!(half.calories, 204.5, 1e-9);
    assert_eq!(per_serving(total, 0), Macros::ZERO);
    assert_eq!(per_serving(total, -1), Macros::ZERO);
    assert_eq!(aggregate_total(&[]), Macros::ZERO);
}

#[test]
fn test_recipe_per_serving_matches_helpers() {
    let chicken = make_food("chicken", 165.0, 31.0, 0.0, 3.6, "100 g");
    let recipe = Recipe::new(
        "r1",
        "Grilled Chicken",
        3,
        vec![RecipeIngredient::from_food(&chicken, 600.0).unwrap()],
        RecipeCategory::Dinner,
        vec![],
    );

    assert_float_absolute_eq!(recipe.total_macros.calories, 990.0, 1e-9);
    assert_float_absolute_eq!(recipe.per_serving_macros.calories, 330.0, 1e-9);
    assert_float_absolute_eq!(recipe.per_serving_macros.protein, 62.0, 1e-9);
}
