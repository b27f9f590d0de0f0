pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlanError, Result};
pub use models::{DayPlan, FullMealPlan, Macros, MealSlot, Recipe};
pub use planner::{plan_meals, reconcile_day_plan, PlanOptions, PlannedMeals};
