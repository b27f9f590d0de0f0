use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Macros, Recipe, RecipeIngredient};

/// Carb-cycling classification of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    #[default]
    Normal,
    Low,
    High,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Low => "low",
            Self::High => "high",
        })
    }
}

impl FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "n" => Ok(Self::Normal),
            "low" | "l" => Ok(Self::Low),
            "high" | "h" => Ok(Self::High),
            other => Err(format!("unknown day type '{}'", other)),
        }
    }
}

/// The part of a recipe a meal slot keeps, copied at assignment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSnapshot {
    pub id: String,
    pub name: String,
    pub per_serving_macros: Macros,
    pub ingredients: Vec<RecipeIngredient>,
    pub defined_servings_in_recipe: u32,
}

impl From<&Recipe> for RecipeSnapshot {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            per_serving_macros: recipe.per_serving_macros,
            ingredients: recipe.ingredients.clone(),
            defined_servings_in_recipe: recipe.servings,
        }
    }
}

/// A named position in a day awaiting (or holding) a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    pub id: String,
    pub slot_name: String,
    #[serde(default)]
    pub assigned_recipe_id: Option<String>,
    #[serde(default)]
    pub recipe_snapshot: Option<RecipeSnapshot>,
    #[serde(default)]
    pub quantity_of_recipe_servings: f64,
}

impl MealSlot {
    pub fn empty(id: impl Into<String>, slot_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slot_name: slot_name.into(),
            assigned_recipe_id: None,
            recipe_snapshot: None,
            quantity_of_recipe_servings: 0.0,
        }
    }

    /// Copy of this slot holding `recipe` at `servings`.
    pub fn with_recipe(&self, recipe: &Recipe, servings: f64) -> Self {
        Self {
            id: self.id.clone(),
            slot_name: self.slot_name.clone(),
            assigned_recipe_id: Some(recipe.id.clone()),
            recipe_snapshot: Some(RecipeSnapshot::from(recipe)),
            quantity_of_recipe_servings: servings,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.recipe_snapshot.is_some()
    }

    /// Per-serving calories of the assigned recipe (0 when unassigned).
    pub fn calories_per_serving(&self) -> f64 {
        self.recipe_snapshot
            .as_ref()
            .map(|s| s.per_serving_macros.calories)
            .unwrap_or(0.0)
    }

    /// Macros this slot contributes at its current multiplier.
    pub fn effective_macros(&self) -> Macros {
        self.recipe_snapshot
            .as_ref()
            .map(|s| s.per_serving_macros * self.quantity_of_recipe_servings)
            .unwrap_or_default()
    }

    pub fn effective_calories(&self) -> f64 {
        self.effective_macros().calories
    }
}

/// One planned day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_index: usize,
    #[serde(default)]
    pub day_type: DayType,
    pub meals: Vec<MealSlot>,
}

impl DayPlan {
    /// Default slot names, used in order for the first meals of a day.
    pub const DEFAULT_SLOT_NAMES: [&'static str; 3] = ["Breakfast", "Lunch", "Dinner"];

    /// A day with `meal_count` empty slots named Breakfast, Lunch, Dinner, Snack 1, ...
    pub fn skeleton(day_index: usize, day_type: DayType, meal_count: usize) -> Self {
        let meals = (0..meal_count)
            .map(|m| {
                let name = match Self::DEFAULT_SLOT_NAMES.get(m) {
                    Some(name) => (*name).to_string(),
                    None => format!("Snack {}", m + 1 - Self::DEFAULT_SLOT_NAMES.len()),
                };
                MealSlot::empty(format!("d{}-m{}", day_index, m), name)
            })
            .collect();
        Self {
            day_index,
            day_type,
            meals,
        }
    }

    /// Sum of every slot's effective macros.
    pub fn realized_macros(&self) -> Macros {
        self.meals.iter().map(MealSlot::effective_macros).sum()
    }

    pub fn unassigned_slot_ids(&self) -> Vec<String> {
        self.meals
            .iter()
            .filter(|m| !m.is_assigned())
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn is_fully_assigned(&self) -> bool {
        self.meals.iter().all(MealSlot::is_assigned)
    }
}

/// Ordered days of a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullMealPlan {
    pub days: Vec<DayPlan>,
}

impl FullMealPlan {
    /// Empty plan of `day_count` days; day types cycle through `day_types`
    /// (all normal when empty).
    pub fn skeleton(day_count: usize, meal_count: usize, day_types: &[DayType]) -> Self {
        let days = (0..day_count)
            .map(|d| {
                let day_type = if day_types.is_empty() {
                    DayType::Normal
                } else {
                    day_types[d % day_types.len()]
                };
                DayPlan::skeleton(d, day_type, meal_count)
            })
            .collect();
        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Slot names of the first day, or the defaults when the plan is empty.
    pub fn slot_names(&self) -> Vec<String> {
        match self.days.first() {
            Some(day) => day.meals.iter().map(|m| m.slot_name.clone()).collect(),
            None => DayPlan::DEFAULT_SLOT_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeCategory;

    fn recipe(calories: f64) -> Recipe {
        let mut r = Recipe::new("r1", "Stew", 2, vec![], RecipeCategory::Dinner, vec![]);
        r.per_serving_macros = Macros::new(calories, 20.0, 30.0, 10.0);
        r
    }

    #[test]
    fn test_skeleton_slot_names() {
        let day = DayPlan::skeleton(1, DayType::Low, 5);
        let names: Vec<&str> = day.meals.iter().map(|m| m.slot_name.as_str()).collect();
        assert_eq!(names, ["Breakfast", "Lunch", "Dinner", "Snack 1", "Snack 2"]);
        assert_eq!(day.meals[0].id, "d1-m0");
        assert!(!day.is_fully_assigned());
    }

    #[test]
    fn test_effective_macros() {
        let slot = MealSlot::empty("s", "Dinner").with_recipe(&recipe(400.0), 1.5);
        assert_eq!(slot.assigned_recipe_id.as_deref(), Some("r1"));
        assert!((slot.effective_calories() - 600.0).abs() < 1e-9);
        assert!((slot.effective_macros().protein - 30.0).abs() < 1e-9);
        assert_eq!(MealSlot::empty("e", "Lunch").effective_macros(), Macros::ZERO);
    }

    #[test]
    fn test_plan_skeleton_cycles_day_types() {
        let plan = FullMealPlan::skeleton(4, 3, &[DayType::High, DayType::Low]);
        let types: Vec<DayType> = plan.days.iter().map(|d| d.day_type).collect();
        assert_eq!(types, [DayType::High, DayType::Low, DayType::High, DayType::Low]);
    }

    #[test]
    fn test_day_type_from_str() {
        assert_eq!("HIGH".parse::<DayType>(), Ok(DayType::High));
        assert_eq!(" low ".parse::<DayType>(), Ok(DayType::Low));
        assert!("medium".parse::<DayType>().is_err());
    }
}
