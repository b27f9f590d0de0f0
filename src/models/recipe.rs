use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{FoodItem, Macros};
use crate::planner::aggregate::{aggregate_total, per_serving};
use crate::planner::nutrients::nutrients_for_quantity;

/// Meal category used by the slot assignment heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Uncategorized,
}

impl RecipeCategory {
    /// The three categories every planned day needs.
    pub const MAIN: [RecipeCategory; 3] = [
        RecipeCategory::Breakfast,
        RecipeCategory::Lunch,
        RecipeCategory::Dinner,
    ];
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
            Self::Uncategorized => "Uncategorized",
        };
        f.write_str(name)
    }
}

/// Diet protocol used to decide which recipes are compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietProtocol {
    /// Every recipe qualifies.
    #[default]
    Standard,
    /// Recipes tagged `keto`.
    Keto,
    /// Recipes tagged `vegetarian` or `vegan`.
    Vegetarian,
    /// Recipes tagged `vegan`.
    Vegan,
}

impl DietProtocol {
    pub fn admits(&self, recipe: &Recipe) -> bool {
        match self {
            Self::Standard => true,
            Self::Keto => recipe.has_tag("keto"),
            Self::Vegetarian => recipe.has_tag("vegetarian") || recipe.has_tag("vegan"),
            Self::Vegan => recipe.has_tag("vegan"),
        }
    }
}

impl FromStr for DietProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "none" => Ok(Self::Standard),
            "keto" => Ok(Self::Keto),
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            other => Err(format!("unknown diet protocol '{}'", other)),
        }
    }
}

/// An ingredient line with nutrients frozen at the time it was added.
///
/// The nutrient fields are not recomputed when the source food item changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub food_item_id: String,
    pub food_item_name: String,
    pub quantity_gram: f64,
    pub original_serving_size: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl RecipeIngredient {
    /// Snapshot `quantity_gram` of `food`.
    ///
    /// Returns `None` for a non-positive quantity or an unusable serving size.
    pub fn from_food(food: &FoodItem, quantity_gram: f64) -> Option<Self> {
        if !(quantity_gram > 0.0) {
            return None;
        }
        let macros = nutrients_for_quantity(food, quantity_gram)?;
        Some(Self {
            food_item_id: food.id.clone(),
            food_item_name: food.name.clone(),
            quantity_gram,
            original_serving_size: food.serving_size.clone(),
            calories: macros.calories,
            protein: macros.protein,
            carbs: macros.carbs,
            fat: macros.fat,
        })
    }

    #[inline]
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// A recipe whose totals are derived from its ingredient snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub total_macros: Macros,
    #[serde(default)]
    pub per_serving_macros: Macros,
    #[serde(default)]
    pub category: RecipeCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Recipe {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        servings: u32,
        ingredients: Vec<RecipeIngredient>,
        category: RecipeCategory,
        tags: Vec<String>,
    ) -> Self {
        let mut recipe = Self {
            id: id.into(),
            name: name.into(),
            servings,
            ingredients,
            total_macros: Macros::ZERO,
            per_serving_macros: Macros::ZERO,
            category,
            tags,
        };
        recipe.recompute();
        recipe
    }

    /// Refresh `total_macros` and `per_serving_macros` from the ingredients.
    pub fn recompute(&mut self) {
        self.total_macros = aggregate_total(&self.ingredients);
        self.per_serving_macros = per_serving(self.total_macros, i64::from(self.servings));
    }

    pub fn add_ingredient(&mut self, ingredient: RecipeIngredient) {
        self.ingredients.push(ingredient);
        self.recompute();
    }

    /// Remove every ingredient referencing `food_item_id`. Returns how many were removed.
    pub fn remove_ingredient(&mut self, food_item_id: &str) -> usize {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i.food_item_id != food_item_id);
        let removed = before - self.ingredients.len();
        if removed > 0 {
            self.recompute();
        }
        removed
    }

    pub fn set_servings(&mut self, servings: u32) {
        self.servings = servings;
        self.recompute();
    }

    /// Case-insensitive tag check.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: &str, calories: f64, serving: &str) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: id.to_uppercase(),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
            serving_size: serving.to_string(),
        }
    }

    #[test]
    fn test_ingredient_snapshot() {
        let oats = food("oats", 380.0, "100 g");
        let ing = RecipeIngredient::from_food(&oats, 50.0).unwrap();
        assert!((ing.calories - 190.0).abs() < 1e-9);
        assert!((ing.protein - 5.0).abs() < 1e-9);
        assert_eq!(ing.original_serving_size, "100 g");
        assert_eq!(ing.food_item_name, "OATS");
    }

    #[test]
    fn test_ingredient_rejects_bad_input() {
        let oats = food("oats", 380.0, "100 g");
        assert!(RecipeIngredient::from_food(&oats, 0.0).is_none());
        assert!(RecipeIngredient::from_food(&oats, -5.0).is_none());

        let mystery = food("mystery", 100.0, "a handful");
        assert!(RecipeIngredient::from_food(&mystery, 50.0).is_none());
    }

    #[test]
    fn test_recipe_totals_follow_edits() {
        let oats = food("oats", 380.0, "100 g");
        let milk = food("milk", 60.0, "100 ml");

        let mut recipe = Recipe::new(
            "r1",
            "Porridge",
            2,
            vec![RecipeIngredient::from_food(&oats, 100.0).unwrap()],
            RecipeCategory::Breakfast,
            vec![],
        );
        assert!((recipe.total_macros.calories - 380.0).abs() < 1e-9);
        assert!((recipe.per_serving_macros.calories - 190.0).abs() < 1e-9);

        recipe.add_ingredient(RecipeIngredient::from_food(&milk, 200.0).unwrap());
        assert!((recipe.total_macros.calories - 500.0).abs() < 1e-9);
        assert!((recipe.per_serving_macros.calories - 250.0).abs() < 1e-9);

        recipe.set_servings(4);
        assert!((recipe.per_serving_macros.calories - 125.0).abs() < 1e-9);

        assert_eq!(recipe.remove_ingredient("milk"), 1);
        assert!((recipe.total_macros.calories - 380.0).abs() < 1e-9);
        assert_eq!(recipe.remove_ingredient("milk"), 0);
    }

    #[test]
    fn test_snapshot_ignores_later_food_edits() {
        let mut oats = food("oats", 380.0, "100 g");
        let recipe = Recipe::new(
            "r1",
            "Porridge",
            1,
            vec![RecipeIngredient::from_food(&oats, 100.0).unwrap()],
            RecipeCategory::Breakfast,
            vec![],
        );
        oats.calories = 999.0;
        assert!((recipe.total_macros.calories - 380.0).abs() < 1e-9);
    }

    #[test]
    fn test_protocol_admits_by_tag() {
        let vegan = Recipe::new("r1", "Tofu", 1, vec![], RecipeCategory::Dinner, vec!["vegan".into()]);
        let plain = Recipe::new("r2", "Steak", 1, vec![], RecipeCategory::Dinner, vec![]);
        assert!(DietProtocol::Standard.admits(&plain));
        assert!(DietProtocol::Vegetarian.admits(&vegan));
        assert!(!DietProtocol::Vegan.admits(&plain));
        assert!(!DietProtocol::Keto.admits(&vegan));
        assert_eq!("KETO".parse::<DietProtocol>(), Ok(DietProtocol::Keto));
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let recipe = Recipe::new(
            "r1",
            "Eggs",
            1,
            vec![],
            RecipeCategory::Breakfast,
            vec!["Keto".to_string()],
        );
        assert!(recipe.has_tag("keto"));
        assert!(!recipe.has_tag("vegan"));
    }
}
