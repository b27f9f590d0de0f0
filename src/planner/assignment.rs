//! Deterministic recipe-to-slot assignment driven by the size of the
//! compliant recipe pool.

use tracing::info;

use crate::error::AssignmentFailure;
use crate::models::{DayPlan, FullMealPlan, MealSlot, Recipe, RecipeCategory};
use crate::planner::constants::{DEFAULT_SERVINGS, MIN_RECIPES_FOR_PLAN, PROPOSAL_RECIPE_THRESHOLD};

/// A day after assignment.
#[derive(Debug, Clone)]
pub struct DayAssignment {
    pub day: DayPlan,
    /// Some slots were left empty because the pool could not cover them.
    pub partial_fill: bool,
}

/// A plan after assignment.
#[derive(Debug, Clone)]
pub struct PlanAssignment {
    pub plan: FullMealPlan,
    /// `day_index` of every day with slots left empty.
    pub partially_filled_days: Vec<usize>,
}

/// Compliant recipes grouped by category, preserving input order.
struct CategoryPools<'a> {
    breakfast: Vec<&'a Recipe>,
    lunch: Vec<&'a Recipe>,
    dinner: Vec<&'a Recipe>,
    /// Snack and uncategorized recipes.
    extras: Vec<&'a Recipe>,
}

impl<'a> CategoryPools<'a> {
    fn new(recipes: &'a [Recipe]) -> Self {
        let mut pools = Self {
            breakfast: Vec::new(),
            lunch: Vec::new(),
            dinner: Vec::new(),
            extras: Vec::new(),
        };
        for recipe in recipes {
            match recipe.category {
                RecipeCategory::Breakfast => pools.breakfast.push(recipe),
                RecipeCategory::Lunch => pools.lunch.push(recipe),
                RecipeCategory::Dinner => pools.dinner.push(recipe),
                RecipeCategory::Snack | RecipeCategory::Uncategorized => pools.extras.push(recipe),
            }
        }
        pools
    }

    fn main(&self, category: RecipeCategory) -> &[&'a Recipe] {
        match category {
            RecipeCategory::Breakfast => &self.breakfast,
            RecipeCategory::Lunch => &self.lunch,
            RecipeCategory::Dinner => &self.dinner,
            RecipeCategory::Snack | RecipeCategory::Uncategorized => &self.extras,
        }
    }

    fn missing_main(&self) -> Vec<RecipeCategory> {
        RecipeCategory::MAIN
            .into_iter()
            .filter(|&c| self.main(c).is_empty())
            .collect()
    }

    /// Recipe for meal `m` of day `d` under round-robin rotation.
    fn pick(&self, d: usize, m: usize) -> &'a Recipe {
        if let Some(&category) = RecipeCategory::MAIN.get(m) {
            let pool = self.main(category);
            return pool[d % pool.len()];
        }
        if self.extras.is_empty() {
            let combined: Vec<&'a Recipe> = self
                .breakfast
                .iter()
                .chain(&self.lunch)
                .chain(&self.dinner)
                .copied()
                .collect();
            combined[(d + m) % combined.len()]
        } else {
            self.extras[(d + m) % self.extras.len()]
        }
    }
}

/// Fill every empty slot of `day` using `choose(meal_index)`.
fn fill_day<'a>(day: &DayPlan, mut choose: impl FnMut(usize) -> Option<&'a Recipe>) -> DayAssignment {
    let mut partial_fill = false;
    let meals = day
        .meals
        .iter()
        .enumerate()
        .map(|(m, slot)| {
            if slot.is_assigned() {
                return slot.clone();
            }
            match choose(m) {
                Some(recipe) => slot.with_recipe(recipe, DEFAULT_SERVINGS),
                None => {
                    partial_fill = true;
                    slot.clone()
                }
            }
        })
        .collect::<Vec<MealSlot>>();

    DayAssignment {
        day: DayPlan {
            day_index: day.day_index,
            day_type: day.day_type,
            meals,
        },
        partial_fill,
    }
}

fn assign_days(days: &[DayPlan], compliant: &[Recipe]) -> Result<Vec<DayAssignment>, AssignmentFailure> {
    let n = compliant.len();

    if n < MIN_RECIPES_FOR_PLAN {
        return Err(AssignmentFailure::InsufficientRecipes { found: n });
    }
    if n >= PROPOSAL_RECIPE_THRESHOLD {
        return Err(AssignmentFailure::RequiresProposal { found: n });
    }

    let pools = CategoryPools::new(compliant);
    let missing = pools.missing_main();

    if n == MIN_RECIPES_FOR_PLAN {
        if days.len() > 1 {
            return Err(AssignmentFailure::SingleDayOnly { days: days.len() });
        }
        if !missing.is_empty() {
            return Err(AssignmentFailure::MiscategorizedRecipes { missing });
        }
        info!("assigning fixed breakfast/lunch/dinner from 3 recipes");
        return Ok(days
            .iter()
            .map(|day| {
                fill_day(day, |m| {
                    RecipeCategory::MAIN
                        .get(m)
                        .map(|&category| pools.main(category)[0])
                })
            })
            .collect());
    }

    if !missing.is_empty() {
        return Err(AssignmentFailure::MissingCategory { missing });
    }
    info!(
        recipes = n,
        breakfast = pools.breakfast.len(),
        lunch = pools.lunch.len(),
        dinner = pools.dinner.len(),
        extras = pools.extras.len(),
        "assigning recipes by day rotation"
    );
    Ok(days
        .iter()
        .map(|day| fill_day(day, |m| Some(pools.pick(day.day_index, m))))
        .collect())
}

/// Populate the empty slots of a single day from the compliant pool.
pub fn assign_recipes_to_day(
    day: &DayPlan,
    compliant: &[Recipe],
) -> Result<DayAssignment, AssignmentFailure> {
    let mut assigned = assign_days(std::slice::from_ref(day), compliant)?;
    Ok(assigned.remove(0))
}

/// Populate the empty slots of every day in `plan` from the compliant pool.
pub fn assign_recipes_to_plan(
    plan: &FullMealPlan,
    compliant: &[Recipe],
) -> Result<PlanAssignment, AssignmentFailure> {
    let assigned = assign_days(&plan.days, compliant)?;
    let partially_filled_days = assigned
        .iter()
        .filter(|a| a.partial_fill)
        .map(|a| a.day.day_index)
        .collect();
    Ok(PlanAssignment {
        plan: FullMealPlan {
            days: assigned.into_iter().map(|a| a.day).collect(),
        },
        partially_filled_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayType, Macros};

    fn recipe(id: &str, category: RecipeCategory) -> Recipe {
        let mut r = Recipe::new(id, id, 1, vec![], category, vec![]);
        r.per_serving_macros = Macros::new(500.0, 30.0, 50.0, 20.0);
        r
    }

    fn assigned_ids(day: &DayPlan) -> Vec<Option<&str>> {
        day.meals
            .iter()
            .map(|m| m.assigned_recipe_id.as_deref())
            .collect()
    }

    fn main_three() -> Vec<Recipe> {
        vec![
            recipe("dinner", RecipeCategory::Dinner),
            recipe("breakfast", RecipeCategory::Breakfast),
            recipe("lunch", RecipeCategory::Lunch),
        ]
    }

    #[test]
    fn test_insufficient_recipes() {
        let day = DayPlan::skeleton(0, DayType::Normal, 3);
        let pool = vec![
            recipe("a", RecipeCategory::Breakfast),
            recipe("b", RecipeCategory::Lunch),
        ];
        let err = assign_recipes_to_day(&day, &pool).unwrap_err();
        assert_eq!(err, AssignmentFailure::InsufficientRecipes { found: 2 });
    }

    #[test]
    fn test_three_recipes_single_day_in_order() {
        let day = DayPlan::skeleton(0, DayType::Normal, 3);
        let result = assign_recipes_to_day(&day, &main_three()).unwrap();
        assert_eq!(
            assigned_ids(&result.day),
            [Some("breakfast"), Some("lunch"), Some("dinner")]
        );
        assert!(!result.partial_fill);
        assert!(result.day.meals.iter().all(|m| m.quantity_of_recipe_servings == 1.0));
    }

    #[test]
    fn test_three_recipes_extra_slots_partial() {
        let day = DayPlan::skeleton(0, DayType::Normal, 5);
        let result = assign_recipes_to_day(&day, &main_three()).unwrap();
        assert!(result.partial_fill);
        assert_eq!(result.day.unassigned_slot_ids(), ["d0-m3", "d0-m4"]);
    }

    #[test]
    fn test_three_recipes_multi_day_rejected() {
        let plan = FullMealPlan::skeleton(2, 3, &[]);
        let err = assign_recipes_to_plan(&plan, &main_three()).unwrap_err();
        assert_eq!(err, AssignmentFailure::SingleDayOnly { days: 2 });
    }

    #[test]
    fn test_three_recipes_miscategorized() {
        let day = DayPlan::skeleton(0, DayType::Normal, 3);
        let pool = vec![
            recipe("a", RecipeCategory::Breakfast),
            recipe("b", RecipeCategory::Breakfast),
            recipe("c", RecipeCategory::Dinner),
        ];
        let err = assign_recipes_to_day(&day, &pool).unwrap_err();
        assert_eq!(
            err,
            AssignmentFailure::MiscategorizedRecipes {
                missing: vec![RecipeCategory::Lunch]
            }
        );
    }

    #[test]
    fn test_rotation_across_days() {
        let pool = vec![
            recipe("b1", RecipeCategory::Breakfast),
            recipe("b2", RecipeCategory::Breakfast),
            recipe("l1", RecipeCategory::Lunch),
            recipe("d1", RecipeCategory::Dinner),
            recipe("d2", RecipeCategory::Dinner),
            recipe("d3", RecipeCategory::Dinner),
            recipe("s1", RecipeCategory::Snack),
            recipe("u1", RecipeCategory::Uncategorized),
        ];
        let plan = FullMealPlan::skeleton(3, 4, &[]);
        let result = assign_recipes_to_plan(&plan, &pool).unwrap();
        assert!(result.partially_filled_days.is_empty());

        let days = &result.plan.days;
        assert_eq!(assigned_ids(&days[0]), [Some("b1"), Some("l1"), Some("d1"), Some("u1")]);
        assert_eq!(assigned_ids(&days[1]), [Some("b2"), Some("l1"), Some("d2"), Some("s1")]);
        assert_eq!(assigned_ids(&days[2]), [Some("b1"), Some("l1"), Some("d3"), Some("u1")]);
    }

    #[test]
    fn test_extra_slots_fall_back_to_main_categories() {
        let pool = vec![
            recipe("b1", RecipeCategory::Breakfast),
            recipe("l1", RecipeCategory::Lunch),
            recipe("l2", RecipeCategory::Lunch),
            recipe("d1", RecipeCategory::Dinner),
        ];
        let day = DayPlan::skeleton(1, DayType::Normal, 5);
        let result = assign_recipes_to_day(&day, &pool).unwrap();
        // Combined pool [b1, l1, l2, d1]: slot 3 -> (1+3)%4 = 0, slot 4 -> (1+4)%4 = 1.
        assert_eq!(
            assigned_ids(&result.day),
            [Some("b1"), Some("l2"), Some("d1"), Some("b1"), Some("l1")]
        );
    }

    #[test]
    fn test_missing_category() {
        let pool = vec![
            recipe("b1", RecipeCategory::Breakfast),
            recipe("b2", RecipeCategory::Breakfast),
            recipe("s1", RecipeCategory::Snack),
            recipe("d1", RecipeCategory::Dinner),
        ];
        let day = DayPlan::skeleton(0, DayType::Normal, 3);
        let err = assign_recipes_to_day(&day, &pool).unwrap_err();
        assert_eq!(
            err,
            AssignmentFailure::MissingCategory {
                missing: vec![RecipeCategory::Lunch]
            }
        );
    }

    #[test]
    fn test_large_pool_requires_proposal() {
        let pool: Vec<Recipe> = (0..10)
            .map(|i| recipe(&format!("r{}", i), RecipeCategory::MAIN[i % 3]))
            .collect();
        let day = DayPlan::skeleton(0, DayType::Normal, 3);
        let err = assign_recipes_to_day(&day, &pool).unwrap_err();
        assert_eq!(err, AssignmentFailure::RequiresProposal { found: 10 });
    }

    #[test]
    fn test_preassigned_slots_kept() {
        let pool = main_three();
        let mut day = DayPlan::skeleton(0, DayType::Normal, 3);
        day.meals[1] = day.meals[1].with_recipe(&pool[0], 2.0);
        let result = assign_recipes_to_day(&day, &pool).unwrap();
        assert_eq!(
            assigned_ids(&result.day),
            [Some("breakfast"), Some("dinner"), Some("dinner")]
        );
        assert_eq!(result.day.meals[1].quantity_of_recipe_servings, 2.0);
    }
}
