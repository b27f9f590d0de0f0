use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::models::{DietProtocol, FoodItem, Recipe, RecipeIngredient};
use crate::planner::constants::FUZZY_MATCH_THRESHOLD;

/// On-disk shape of the library file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryFile {
    #[serde(default)]
    pub foods: Vec<FoodItem>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

/// Read-mostly inventory of food items and recipes.
pub struct RecipeLibrary {
    /// Foods keyed by id.
    foods: HashMap<String, FoodItem>,
    /// Recipes keyed by id.
    recipes: HashMap<String, Recipe>,
}

impl RecipeLibrary {
    /// Build a library; duplicate ids keep the last occurrence.
    pub fn new(foods: Vec<FoodItem>, recipes: Vec<Recipe>) -> Self {
        let foods = foods.into_iter().map(|f| (f.id.clone(), f)).collect();
        let recipes = recipes.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { foods, recipes }
    }

    pub fn from_file(file: LibraryFile) -> Self {
        Self::new(file.foods, file.recipes)
    }

    pub fn get_food(&self, id: &str) -> Option<&FoodItem> {
        self.foods.get(id)
    }

    pub fn get_recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Foods whose serving size parses, sorted by name.
    pub fn usable_foods(&self) -> Vec<&FoodItem> {
        let mut foods: Vec<&FoodItem> = self.foods.values().filter(|f| f.is_usable()).collect();
        foods.sort_by(|a, b| a.name.cmp(&b.name));
        foods
    }

    /// Find a usable food whose name matches `query` exactly, ignoring case.
    pub fn find_food(&self, query: &str) -> Option<&FoodItem> {
        let needle = query.trim().to_lowercase();
        self.usable_foods()
            .into_iter()
            .find(|f| f.name.to_lowercase() == needle)
    }

    /// Usable foods whose Jaro-Winkler similarity to `query` exceeds the fuzzy
    /// threshold, best match first.
    pub fn fuzzy_matches(&self, query: &str) -> Vec<&FoodItem> {
        let needle = query.trim().to_lowercase();

        let mut candidates: Vec<(&FoodItem, f64)> = self
            .usable_foods()
            .into_iter()
            .map(|f| (f, jaro_winkler(&f.name.to_lowercase(), &needle)))
            .filter(|(_, score)| *score > FUZZY_MATCH_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (food, score) in &candidates {
            debug!(query, score, food = %food.debug_string(), "fuzzy food candidate");
        }
        candidates.into_iter().map(|(f, _)| f).collect()
    }

    /// All recipes sorted by name.
    pub fn all_recipes(&self) -> Vec<&Recipe> {
        let mut recipes: Vec<&Recipe> = self.recipes.values().collect();
        recipes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        recipes
    }

    /// Recipes admitted by `protocol`, cloned in name order.
    pub fn compliant_recipes(&self, protocol: DietProtocol) -> Vec<Recipe> {
        self.all_recipes()
            .into_iter()
            .filter(|r| protocol.admits(r))
            .cloned()
            .collect()
    }

    /// Add `quantity_gram` of food `food_id` to recipe `recipe_id`.
    pub fn add_ingredient(&mut self, recipe_id: &str, food_id: &str, quantity_gram: f64) -> Result<()> {
        let food = self
            .foods
            .get(food_id)
            .ok_or_else(|| PlanError::FoodNotFound(food_id.to_string()))?;
        let ingredient = RecipeIngredient::from_food(food, quantity_gram).ok_or_else(|| {
            PlanError::InvalidInput(format!(
                "cannot compute nutrients for {} g of '{}' (serving size '{}')",
                quantity_gram, food.name, food.serving_size
            ))
        })?;
        let recipe = self
            .recipes
            .get_mut(recipe_id)
            .ok_or_else(|| PlanError::RecipeNotFound(recipe_id.to_string()))?;
        recipe.add_ingredient(ingredient);
        Ok(())
    }

    pub fn to_file(&self) -> LibraryFile {
        let mut foods: Vec<FoodItem> = self.foods.values().cloned().collect();
        foods.sort_by(|a, b| a.id.cmp(&b.id));
        let mut recipes: Vec<Recipe> = self.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| a.id.cmp(&b.id));
        LibraryFile { foods, recipes }
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}
