/// Minimum calories a single meal may provide after scaling.
pub const MEAL_CALORIE_FLOOR: f64 = 250.0;

/// Maximum calories per meal when a day has more than `FEW_MEALS_THRESHOLD` slots.
pub const MEAL_CALORIE_CEILING: f64 = 750.0;

/// Days with this many slots or fewer have no per-meal ceiling.
pub const FEW_MEALS_THRESHOLD: usize = 3;

/// Constraint-resolution passes run by the clamp-and-redistribute scaler.
pub const MAX_RECONCILE_PASSES: usize = 5;

/// Smallest serving multiplier produced by uniform scaling.
pub const MIN_SERVING_MULTIPLIER: f64 = 0.01;

/// Slack allowed when testing a meal's calories against its bounds.
pub const BOUND_TOLERANCE_KCAL: f64 = 1e-6;

/// Fewer compliant recipes than this cannot fill a day.
pub const MIN_RECIPES_FOR_PLAN: usize = 3;

/// From this many compliant recipes on, assignment is delegated to a proposer.
pub const PROPOSAL_RECIPE_THRESHOLD: usize = 10;

/// Starting multiplier given to a freshly assigned slot.
pub const DEFAULT_SERVINGS: f64 = 1.0;

/// Deviation from target calories (kcal) above which a reconciled day is
/// logged as best-effort.
pub const DEVIATION_WARN_KCAL: f64 = 50.0;

/// Minimum Jaro-Winkler similarity for a fuzzy food-name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;
