use serde::{Deserialize, Serialize};

use crate::models::Macros;
use crate::planner::nutrients::parse_serving_size_to_grams;

/// A food item with nutrient values declared for one `serving_size`.
///
/// `serving_size` is free text such as `"100 grams"` or `"250 مل"`; it must
/// encode a gram (or millilitre) amount for the item to be usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,

    pub name: String,

    #[serde(alias = "caloriesPerServing")]
    pub calories: f64,

    #[serde(alias = "proteinPerServing")]
    pub protein: f64,

    #[serde(alias = "carbsPerServing")]
    pub carbs: f64,

    #[serde(alias = "fatPerServing")]
    pub fat: f64,

    pub serving_size: String,
}

impl FoodItem {
    /// Declared nutrients for one serving.
    #[inline]
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein, self.carbs, self.fat)
    }

    /// Gram weight of one declared serving, if the serving size parses.
    pub fn base_weight_grams(&self) -> Option<f64> {
        parse_serving_size_to_grams(&self.serving_size)
    }

    /// Usable in calculations: serving size parses to a positive weight.
    pub fn is_usable(&self) -> bool {
        self.base_weight_grams().is_some_and(|g| g > 0.0)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} ({}): {} kcal, P:{} C:{} F:{} per {}",
            self.name, self.id, self.calories, self.protein, self.carbs, self.fat, self.serving_size
        )
    }
}
