pub mod aggregate;
pub mod assignment;
pub mod constants;
pub mod nutrients;
pub mod pipeline;
pub mod proposal;
pub mod reconcile;
pub mod targets;

pub use aggregate::{aggregate_total, per_serving};
pub use assignment::{assign_recipes_to_day, assign_recipes_to_plan, DayAssignment, PlanAssignment};
pub use constants::*;
pub use nutrients::{nutrients_for_quantity, parse_serving_size_to_grams};
pub use pipeline::{plan_meals, PlanOptions, PlannedMeals};
pub use proposal::{
    apply_proposal, DailyTarget, MealPlanProposer, ProposalRequest, ProposedDay, ProposedMeal,
    ProposedPlan,
};
pub use reconcile::{
    reconcile_day_plan, reconcile_with, reconcile_with_targets, ClampRedistributeScaler,
    MealCountPolicy, PortionScaler, Reconciliation,
};
pub use targets::{average_target, FixedTargets, TargetMacroSource};
