use thiserror::Error;

use crate::models::RecipeCategory;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Assignment failed: {0}")]
    Assignment(#[from] AssignmentFailure),

    #[error("Reconciliation failed: {0}")]
    Reconciliation(#[from] ReconciliationFailure),

    #[error("Proposal failed: {0}")]
    Proposal(#[from] ProposalError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Why recipes could not be placed into meal slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentFailure {
    #[error("insufficient recipes: need at least 3 compliant recipes, found {found}")]
    InsufficientRecipes { found: usize },

    #[error("only a single day can be planned with exactly 3 recipes (requested {days} days)")]
    SingleDayOnly { days: usize },

    #[error("miscategorized recipes: with 3 recipes, one each of breakfast, lunch and dinner is required (missing {missing:?})")]
    MiscategorizedRecipes { missing: Vec<RecipeCategory> },

    #[error("missing category: add at least one recipe for {missing:?}")]
    MissingCategory { missing: Vec<RecipeCategory> },

    #[error("{found} compliant recipes require an external plan proposal")]
    RequiresProposal { found: usize },
}

/// Why a day plan could not be scaled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationFailure {
    #[error("missing target macros for this day")]
    MissingTarget,

    #[error("unassigned slots: {slot_ids:?}")]
    UnassignedSlots { slot_ids: Vec<String> },

    #[error("zero-calorie plan: assigned recipes provide no calories")]
    ZeroCaloriePlan,
}

/// Failure reported by an external meal-plan proposal service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    #[error("no proposal service configured")]
    Unavailable,

    #[error("proposal service error: {0}")]
    Service(String),
}
