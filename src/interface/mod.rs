pub mod prompts;
pub mod render;

pub use prompts::{prompt_food_choice, prompt_target_calories, prompt_target_macros, prompt_yes_no};
pub use render::{display_meal_plan, display_nutrients, display_recipe_list};
