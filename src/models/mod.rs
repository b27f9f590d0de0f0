pub mod food;
pub mod macros;
pub mod plan;
pub mod recipe;

pub use food::FoodItem;
pub use macros::Macros;
pub use plan::{DayPlan, DayType, FullMealPlan, MealSlot, RecipeSnapshot};
pub use recipe::{DietProtocol, Recipe, RecipeCategory, RecipeIngredient};
