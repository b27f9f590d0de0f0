//! Full planning pass: assign recipes to every day, then scale each day.

use tracing::info;

use crate::error::{ProposalError, Result};
use crate::models::{DayPlan, DayType, DietProtocol, FullMealPlan, MealSlot, Recipe};
use crate::planner::assignment::assign_recipes_to_plan;
use crate::planner::constants::{
    MAX_RECONCILE_PASSES, MIN_SERVING_MULTIPLIER, PROPOSAL_RECIPE_THRESHOLD,
};
use crate::planner::proposal::{apply_proposal, DailyTarget, MealPlanProposer, ProposalRequest};
use crate::planner::reconcile::{
    reconcile_with_targets, ClampRedistributeScaler, MealCountPolicy, PortionScaler, Reconciliation,
};
use crate::planner::targets::{average_target, TargetMacroSource};

/// Collaborators and knobs for `plan_meals`.
pub struct PlanOptions<'a> {
    pub targets: &'a dyn TargetMacroSource,
    pub scaler: &'a dyn PortionScaler,
    pub proposer: Option<&'a dyn MealPlanProposer>,
    pub policy: MealCountPolicy,
    pub protocol: DietProtocol,
    pub user_weight_kg: Option<f64>,
}

impl<'a> PlanOptions<'a> {
    /// Default scaler and policy, no proposer.
    pub fn new(targets: &'a dyn TargetMacroSource) -> Self {
        static DEFAULT_SCALER: ClampRedistributeScaler = ClampRedistributeScaler {
            max_passes: MAX_RECONCILE_PASSES,
            min_multiplier: MIN_SERVING_MULTIPLIER,
        };
        Self {
            targets,
            scaler: &DEFAULT_SCALER,
            proposer: None,
            policy: MealCountPolicy::default(),
            protocol: DietProtocol::default(),
            user_weight_kg: None,
        }
    }
}

/// Result of a full planning pass.
#[derive(Debug, Clone)]
pub struct PlannedMeals {
    pub plan: FullMealPlan,
    /// One entry per scaled day, in plan order.
    pub reconciliations: Vec<Reconciliation>,
    /// `day_index` of days that still have empty slots.
    pub partially_filled_days: Vec<usize>,
}

fn request_proposal(
    plan: &FullMealPlan,
    compliant: &[Recipe],
    options: &PlanOptions<'_>,
) -> Result<FullMealPlan> {
    let proposer = options.proposer.ok_or(ProposalError::Unavailable)?;
    let day_types: Vec<DayType> = plan.days.iter().map(|d| d.day_type).collect();
    let daily_targets = plan
        .days
        .iter()
        .filter_map(|d| {
            options.targets.target_for(d.day_type).map(|target| DailyTarget {
                day_index: d.day_index,
                target,
            })
        })
        .collect();
    let request = ProposalRequest {
        daily_targets,
        recipe_pool: compliant,
        protocol: options.protocol,
        slot_names: plan.slot_names(),
        user_weight_kg: options.user_weight_kg,
        average_target: average_target(options.targets, &day_types),
    };

    info!(recipes = compliant.len(), days = plan.len(), "requesting plan proposal");
    let proposal = proposer.propose(&request)?;
    Ok(apply_proposal(plan, &proposal, compliant))
}

/// Scale only the assigned slots of `day`, leaving empty slots untouched.
fn reconcile_assigned_slots(
    day: &DayPlan,
    options: &PlanOptions<'_>,
) -> Result<Option<Reconciliation>> {
    let assigned: Vec<MealSlot> = day.meals.iter().filter(|m| m.is_assigned()).cloned().collect();
    if assigned.is_empty() {
        return Ok(None);
    }
    let subset = DayPlan {
        day_index: day.day_index,
        day_type: day.day_type,
        meals: assigned,
    };
    let mut result =
        reconcile_with_targets(options.scaler, &subset, options.targets, &options.policy)?;

    let meals = day
        .meals
        .iter()
        .map(|slot| {
            result
                .plan
                .meals
                .iter()
                .find(|scaled| scaled.id == slot.id)
                .cloned()
                .unwrap_or_else(|| slot.clone())
        })
        .collect();
    result.plan = DayPlan {
        day_index: day.day_index,
        day_type: day.day_type,
        meals,
    };
    Ok(Some(result))
}

/// Assign recipes to every empty slot of `plan` and scale each day toward
/// its target.
///
/// Pools of `PROPOSAL_RECIPE_THRESHOLD` recipes or more go through
/// `options.proposer`; smaller pools use the rotation heuristics. A plan
/// whose slots are all assigned is only scaled.
pub fn plan_meals(
    plan: &FullMealPlan,
    compliant: &[Recipe],
    options: &PlanOptions<'_>,
) -> Result<PlannedMeals> {
    let assigned = if plan.days.iter().all(DayPlan::is_fully_assigned) {
        info!(days = plan.len(), "plan fully assigned, scaling only");
        plan.clone()
    } else if compliant.len() >= PROPOSAL_RECIPE_THRESHOLD {
        request_proposal(plan, compliant, options)?
    } else {
        assign_recipes_to_plan(plan, compliant)?.plan
    };

    let mut days = Vec::with_capacity(assigned.len());
    let mut reconciliations = Vec::with_capacity(assigned.len());
    let mut partially_filled_days = Vec::new();

    for day in &assigned.days {
        if day.is_fully_assigned() {
            let result =
                reconcile_with_targets(options.scaler, day, options.targets, &options.policy)?;
            days.push(result.plan.clone());
            reconciliations.push(result);
            continue;
        }

        partially_filled_days.push(day.day_index);
        match reconcile_assigned_slots(day, options)? {
            Some(result) => {
                days.push(result.plan.clone());
                reconciliations.push(result);
            }
            None => days.push(day.clone()),
        }
    }

    Ok(PlannedMeals {
        plan: FullMealPlan { days },
        reconciliations,
        partially_filled_days,
    })
}
