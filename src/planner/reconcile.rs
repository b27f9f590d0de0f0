//! Portion scaling: adjust each slot's serving multiplier so a day's calories
//! approach its target while every meal stays within per-meal bounds.

use tracing::{debug, warn};

use crate::error::ReconciliationFailure;
use crate::models::{DayPlan, Macros, MealSlot};
use crate::planner::constants::*;
use crate::planner::targets::TargetMacroSource;

/// Per-meal calorie bounds, depending on how many slots a day has.
#[derive(Debug, Clone, PartialEq)]
pub struct MealCountPolicy {
    pub floor_kcal: f64,
    pub ceiling_kcal: f64,
    /// Days with at most this many slots have no ceiling.
    pub few_meals_threshold: usize,
}

impl Default for MealCountPolicy {
    fn default() -> Self {
        Self {
            floor_kcal: MEAL_CALORIE_FLOOR,
            ceiling_kcal: MEAL_CALORIE_CEILING,
            few_meals_threshold: FEW_MEALS_THRESHOLD,
        }
    }
}

impl MealCountPolicy {
    pub fn ceiling_for(&self, slot_count: usize) -> f64 {
        if slot_count <= self.few_meals_threshold {
            f64::INFINITY
        } else {
            self.ceiling_kcal
        }
    }
}

/// Outcome of scaling one day.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub plan: DayPlan,
    pub target: Macros,
    pub realized: Macros,
    /// Constraint-resolution passes that ran.
    pub passes: usize,
}

impl Reconciliation {
    /// Realized minus target calories. Positive means the day overshoots.
    pub fn calorie_deviation(&self) -> f64 {
        self.realized.calories - self.target.calories
    }
}

/// Strategy that turns an assigned day plus a target into scaled servings.
pub trait PortionScaler {
    fn scale(
        &self,
        day: &DayPlan,
        target: &Macros,
        policy: &MealCountPolicy,
    ) -> Result<Reconciliation, ReconciliationFailure>;
}

/// Bounded clamp-and-redistribute scaling driven by calories only.
#[derive(Debug, Clone)]
pub struct ClampRedistributeScaler {
    pub max_passes: usize,
    pub min_multiplier: f64,
}

impl Default for ClampRedistributeScaler {
    fn default() -> Self {
        Self {
            max_passes: MAX_RECONCILE_PASSES,
            min_multiplier: MIN_SERVING_MULTIPLIER,
        }
    }
}

/// Validate inputs and return the day's current calories.
fn check_preconditions(day: &DayPlan, target: &Macros) -> Result<f64, ReconciliationFailure> {
    if !(target.calories.is_finite() && target.calories > 0.0) {
        return Err(ReconciliationFailure::MissingTarget);
    }

    let unassigned = day.unassigned_slot_ids();
    if !unassigned.is_empty() {
        return Err(ReconciliationFailure::UnassignedSlots {
            slot_ids: unassigned,
        });
    }

    let current = day.realized_macros().calories;
    if !(current > 0.0) {
        return Err(ReconciliationFailure::ZeroCaloriePlan);
    }
    Ok(current)
}

impl PortionScaler for ClampRedistributeScaler {
    fn scale(
        &self,
        day: &DayPlan,
        target: &Macros,
        policy: &MealCountPolicy,
    ) -> Result<Reconciliation, ReconciliationFailure> {
        let current = check_preconditions(day, target)?;
        let target_kcal = target.calories;
        let floor = policy.floor_kcal;
        let ceiling = policy.ceiling_for(day.meals.len());

        let kcal: Vec<f64> = day.meals.iter().map(MealSlot::calories_per_serving).collect();
        let mut mult: Vec<f64> = day
            .meals
            .iter()
            .map(|m| m.quantity_of_recipe_servings)
            .collect();

        let initial = target_kcal / current;
        for m in mult.iter_mut() {
            *m = (*m * initial).max(self.min_multiplier);
        }

        let mut passes = 0;
        for pass in 0..self.max_passes {
            passes = pass + 1;
            let mut clamped = vec![false; mult.len()];
            let mut clamped_kcal = 0.0;

            for i in 0..mult.len() {
                // Zero-calorie recipes cannot reach any bound.
                if kcal[i] <= 0.0 {
                    continue;
                }
                let meal = mult[i] * kcal[i];
                let bound = if meal < floor - BOUND_TOLERANCE_KCAL {
                    Some(floor)
                } else if meal > ceiling + BOUND_TOLERANCE_KCAL {
                    Some(ceiling)
                } else {
                    None
                };
                if let Some(bound) = bound {
                    mult[i] = bound / kcal[i];
                    clamped[i] = true;
                    clamped_kcal += bound;
                }
            }

            let clamped_count = clamped.iter().filter(|&&c| c).count();
            if clamped_count == 0 && pass > 0 {
                debug!(day = day.day_index, pass = passes, "no meals clamped, stopping");
                break;
            }

            let unclamped_total: f64 = (0..mult.len())
                .filter(|&i| !clamped[i])
                .map(|i| mult[i] * kcal[i])
                .sum();
            let remaining = target_kcal - clamped_kcal;

            if remaining > 0.0 && unclamped_total > 0.0 {
                let factor = remaining / unclamped_total;
                for i in (0..mult.len()).filter(|&i| !clamped[i]) {
                    mult[i] = (mult[i] * factor).max(self.min_multiplier);
                }
            }

            debug!(
                day = day.day_index,
                pass = passes,
                clamped = clamped_count,
                remaining_kcal = remaining,
                "reconciliation pass"
            );
        }

        // Final uniform correction, then the floor wins over the target.
        let total: f64 = mult.iter().zip(&kcal).map(|(m, k)| m * k).sum();
        if total > 0.0 {
            let factor = target_kcal / total;
            for m in mult.iter_mut() {
                *m = (*m * factor).max(self.min_multiplier);
            }
        }
        for (m, &k) in mult.iter_mut().zip(&kcal) {
            if k > 0.0 && *m * k < floor - BOUND_TOLERANCE_KCAL {
                *m = floor / k;
            }
        }

        let meals = day
            .meals
            .iter()
            .zip(&mult)
            .map(|(slot, &m)| MealSlot {
                quantity_of_recipe_servings: m,
                ..slot.clone()
            })
            .collect();
        let plan = DayPlan {
            day_index: day.day_index,
            day_type: day.day_type,
            meals,
        };
        let realized = plan.realized_macros();

        let result = Reconciliation {
            plan,
            target: *target,
            realized,
            passes,
        };
        if result.calorie_deviation().abs() > DEVIATION_WARN_KCAL {
            warn!(
                day = day.day_index,
                target_kcal,
                realized_kcal = realized.calories,
                "meal bounds prevent hitting the calorie target"
            );
        }
        Ok(result)
    }
}

/// Scale `day` with `scaler`, failing with `MissingTarget` when `target` is absent.
pub fn reconcile_with(
    scaler: &dyn PortionScaler,
    day: &DayPlan,
    target: Option<&Macros>,
    policy: &MealCountPolicy,
) -> Result<Reconciliation, ReconciliationFailure> {
    let target = target.ok_or(ReconciliationFailure::MissingTarget)?;
    scaler.scale(day, target, policy)
}

/// Scale `day` toward `target` with the default clamp-and-redistribute scaler.
pub fn reconcile_day_plan(
    day: &DayPlan,
    target: Option<&Macros>,
    policy: &MealCountPolicy,
) -> Result<DayPlan, ReconciliationFailure> {
    reconcile_with(&ClampRedistributeScaler::default(), day, target, policy).map(|r| r.plan)
}

/// Look up the day's target from `source` by day type, then scale.
pub fn reconcile_with_targets(
    scaler: &dyn PortionScaler,
    day: &DayPlan,
    source: &dyn TargetMacroSource,
    policy: &MealCountPolicy,
) -> Result<Reconciliation, ReconciliationFailure> {
    let target = source.target_for(day.day_type);
    reconcile_with(scaler, day, target.as_ref(), policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayType, Recipe, RecipeCategory};

    fn recipe(id: &str, kcal: f64) -> Recipe {
        let mut r = Recipe::new(id, id, 1, vec![], RecipeCategory::Uncategorized, vec![]);
        r.per_serving_macros = Macros::new(kcal, kcal / 20.0, kcal / 10.0, kcal / 40.0);
        r.total_macros = r.per_serving_macros;
        r
    }

    fn day_with(kcals: &[f64]) -> DayPlan {
        let skeleton = DayPlan::skeleton(0, DayType::Normal, kcals.len());
        DayPlan {
            meals: skeleton
                .meals
                .iter()
                .zip(kcals)
                .enumerate()
                .map(|(i, (slot, &k))| slot.with_recipe(&recipe(&format!("r{}", i), k), 1.0))
                .collect(),
            ..skeleton
        }
    }

    fn target(kcal: f64) -> Macros {
        Macros::new(kcal, 150.0, 200.0, 60.0)
    }

    fn meal_kcals(day: &DayPlan) -> Vec<f64> {
        day.meals.iter().map(MealSlot::effective_calories).collect()
    }

    #[test]
    fn test_ceiling_policy() {
        let policy = MealCountPolicy::default();
        assert!(policy.ceiling_for(3).is_infinite());
        assert_eq!(policy.ceiling_for(4), 750.0);
    }

    #[test]
    fn test_three_meal_scenario() {
        let day = day_with(&[400.0, 600.0, 500.0]);
        let out = reconcile_day_plan(&day, Some(&target(2000.0)), &MealCountPolicy::default())
            .unwrap();
        let kcals = meal_kcals(&out);
        assert!((kcals.iter().sum::<f64>() - 2000.0).abs() < 1e-6);
        assert!(kcals.iter().all(|&k| k >= 250.0 - 1e-6));
        // No ceiling with three meals, so the split stays proportional.
        assert!((out.meals[1].quantity_of_recipe_servings - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_raises_small_meals() {
        let day = day_with(&[100.0, 600.0, 800.0]);
        let out = reconcile_day_plan(&day, Some(&target(1500.0)), &MealCountPolicy::default())
            .unwrap();
        let kcals = meal_kcals(&out);
        assert!((kcals[0] - 250.0).abs() < 1e-6);
        assert!((kcals.iter().sum::<f64>() - 1500.0).abs() < 1e-6);
    }

    #[test]
    fn test_ceiling_redistributes_to_other_meals() {
        let day = day_with(&[1000.0, 300.0, 300.0, 300.0]);
        let out = reconcile_day_plan(&day, Some(&target(2000.0)), &MealCountPolicy::default())
            .unwrap();
        let kcals = meal_kcals(&out);
        assert!((kcals[0] - 750.0).abs() < 1e-6);
        assert!(kcals.iter().all(|&k| k <= 750.0 + 1e-6 && k >= 250.0 - 1e-6));
        assert!((kcals.iter().sum::<f64>() - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_final_floor_reclamp_overshoots_target() {
        // Floors of three tiny meals plus the ceiling of the big one exceed the
        // target; the final correction drops meals under the floor and the
        // re-clamp lifts them back, leaving the day above target.
        let day = day_with(&[100.0, 100.0, 100.0, 2000.0]);
        let result = ClampRedistributeScaler::default()
            .scale(&day, &target(1200.0), &MealCountPolicy::default())
            .unwrap();
        let kcals = meal_kcals(&result.plan);
        for k in &kcals[..3] {
            assert!((k - 250.0).abs() < 1e-6);
        }
        assert!((kcals[3] - 600.0).abs() < 1e-6);
        assert!((result.calorie_deviation() - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let policy = MealCountPolicy::default();
        let day = day_with(&[450.0, 520.0, 610.0, 300.0]);
        let once = reconcile_day_plan(&day, Some(&target(2200.0)), &policy).unwrap();
        let twice = reconcile_day_plan(&once, Some(&target(2200.0)), &policy).unwrap();
        for (a, b) in once.meals.iter().zip(&twice.meals) {
            assert!((a.quantity_of_recipe_servings - b.quantity_of_recipe_servings).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_target() {
        let day = day_with(&[400.0, 600.0, 500.0]);
        let policy = MealCountPolicy::default();
        assert_eq!(
            reconcile_day_plan(&day, None, &policy),
            Err(ReconciliationFailure::MissingTarget)
        );
        assert_eq!(
            reconcile_day_plan(&day, Some(&target(0.0)), &policy),
            Err(ReconciliationFailure::MissingTarget)
        );
    }

    #[test]
    fn test_unassigned_slots() {
        let mut day = day_with(&[400.0, 600.0, 500.0]);
        day.meals.push(MealSlot::empty("extra", "Snack 1"));
        let err = reconcile_day_plan(&day, Some(&target(2000.0)), &MealCountPolicy::default())
            .unwrap_err();
        assert_eq!(
            err,
            ReconciliationFailure::UnassignedSlots {
                slot_ids: vec!["extra".to_string()]
            }
        );
    }

    #[test]
    fn test_zero_calorie_plan() {
        let day = day_with(&[0.0, 0.0, 0.0]);
        assert_eq!(
            reconcile_day_plan(&day, Some(&target(2000.0)), &MealCountPolicy::default()),
            Err(ReconciliationFailure::ZeroCaloriePlan)
        );
    }

    #[test]
    fn test_reconcile_with_targets_uses_day_type() {
        let mut day = day_with(&[400.0, 600.0, 500.0]);
        day.day_type = DayType::Low;
        let source = |t: DayType| (t == DayType::Low).then(|| target(1500.0));
        let result = reconcile_with_targets(
            &ClampRedistributeScaler::default(),
            &day,
            &source,
            &MealCountPolicy::default(),
        )
        .unwrap();
        assert!((result.realized.calories - 1500.0).abs() < 1e-6);

        day.day_type = DayType::High;
        let err = reconcile_with_targets(
            &ClampRedistributeScaler::default(),
            &day,
            &source,
            &MealCountPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err, ReconciliationFailure::MissingTarget);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let day = day_with(&[400.0, 600.0, 500.0]);
        let before = day.clone();
        let _ = reconcile_day_plan(&day, Some(&target(2500.0)), &MealCountPolicy::default());
        assert_eq!(day, before);
    }
}
