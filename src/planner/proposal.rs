//! Validation of externally proposed plans, used once the compliant pool is
//! too large for the rotation heuristics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProposalError;
use crate::models::{DayPlan, DietProtocol, FullMealPlan, Macros, Recipe};
use crate::planner::constants::DEFAULT_SERVINGS;

/// Per-day target passed to a proposer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTarget {
    pub day_index: usize,
    pub target: Macros,
}

/// Everything a proposer receives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest<'a> {
    pub daily_targets: Vec<DailyTarget>,
    pub recipe_pool: &'a [Recipe],
    pub protocol: DietProtocol,
    pub slot_names: Vec<String>,
    pub user_weight_kg: Option<f64>,
    pub average_target: Option<Macros>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedMeal {
    pub recipe_id: String,
    #[serde(default = "default_servings")]
    pub quantity_of_recipe_servings: f64,
}

fn default_servings() -> f64 {
    DEFAULT_SERVINGS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedDay {
    pub day_index: usize,
    pub meals: Vec<ProposedMeal>,
}

/// Candidate assignment returned by a proposer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedPlan {
    pub days: Vec<ProposedDay>,
}

/// External service that proposes a multi-day assignment.
pub trait MealPlanProposer {
    fn propose(&self, request: &ProposalRequest<'_>) -> Result<ProposedPlan, ProposalError>;
}

/// A ready-made proposal (e.g. loaded from disk) answers every request.
impl MealPlanProposer for ProposedPlan {
    fn propose(&self, _request: &ProposalRequest<'_>) -> Result<ProposedPlan, ProposalError> {
        Ok(self.clone())
    }
}

/// Apply `proposal` onto the empty slots of `plan`.
///
/// Meals are matched to slots by position. Meals referencing recipes outside
/// `compliant` are discarded, leaving their slot empty; non-positive or
/// non-finite multipliers fall back to one serving.
pub fn apply_proposal(
    plan: &FullMealPlan,
    proposal: &ProposedPlan,
    compliant: &[Recipe],
) -> FullMealPlan {
    let by_id: HashMap<&str, &Recipe> = compliant.iter().map(|r| (r.id.as_str(), r)).collect();
    let by_day: HashMap<usize, &ProposedDay> =
        proposal.days.iter().map(|d| (d.day_index, d)).collect();

    for proposed in &proposal.days {
        if !plan.days.iter().any(|d| d.day_index == proposed.day_index) {
            warn!(day = proposed.day_index, "proposal references a day outside the plan");
        }
    }

    let days = plan
        .days
        .iter()
        .map(|day| {
            let Some(proposed) = by_day.get(&day.day_index) else {
                return day.clone();
            };
            let meals = day
                .meals
                .iter()
                .enumerate()
                .map(|(m, slot)| {
                    if slot.is_assigned() {
                        return slot.clone();
                    }
                    let Some(meal) = proposed.meals.get(m) else {
                        return slot.clone();
                    };
                    match by_id.get(meal.recipe_id.as_str()) {
                        Some(recipe) => {
                            let servings = meal.quantity_of_recipe_servings;
                            let servings = if servings.is_finite() && servings > 0.0 {
                                servings
                            } else {
                                DEFAULT_SERVINGS
                            };
                            slot.with_recipe(recipe, servings)
                        }
                        None => {
                            warn!(
                                day = day.day_index,
                                slot = %slot.id,
                                recipe_id = %meal.recipe_id,
                                "discarding proposed meal with unknown recipe"
                            );
                            slot.clone()
                        }
                    }
                })
                .collect();
            DayPlan {
                day_index: day.day_index,
                day_type: day.day_type,
                meals,
            }
        })
        .collect();

    FullMealPlan { days }
}
