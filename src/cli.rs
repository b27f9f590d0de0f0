use clap::{Parser, Subcommand};

/// Macro Meal Planner: builds multi-day meal plans that hit daily macro targets.
#[derive(Parser, Debug)]
#[command(name = "macro_meal_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food and recipe library JSON file.
    #[arg(short, long, global = true, default_value = "meal_library.json")]
    pub file: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign recipes to every meal slot and scale servings toward the targets.
    Plan(PlanArgs),

    /// Show the nutrients of a quantity of food.
    Nutrients {
        /// Food name (fuzzy matched).
        food: String,

        /// Quantity in grams.
        grams: f64,
    },

    /// List recipes in the library.
    Recipes {
        /// Only show recipes admitted by this diet protocol.
        #[arg(long)]
        protocol: Option<String>,
    },

    /// Add an ingredient to a recipe and save the library.
    AddIngredient {
        /// Recipe id.
        recipe: String,

        /// Food name (fuzzy matched).
        food: String,

        /// Quantity in grams.
        grams: f64,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct PlanArgs {
    /// Number of days to plan.
    #[arg(short, long, default_value_t = 1)]
    pub days: usize,

    /// Meals per day.
    #[arg(short, long, default_value_t = 3)]
    pub meals: usize,

    /// Comma-separated day types (normal, low, high), cycled across days.
    #[arg(long, value_delimiter = ',')]
    pub day_types: Vec<String>,

    /// Diet protocol (standard, keto, vegetarian, vegan).
    #[arg(long, default_value = "standard")]
    pub protocol: String,

    /// JSON file with per-day-type targets.
    #[arg(long)]
    pub targets: Option<String>,

    /// Daily calorie target.
    #[arg(long)]
    pub calories: Option<f64>,

    /// Daily protein target in grams.
    #[arg(long)]
    pub protein: Option<f64>,

    /// Daily carb target in grams.
    #[arg(long)]
    pub carbs: Option<f64>,

    /// Daily fat target in grams.
    #[arg(long)]
    pub fat: Option<f64>,

    /// Existing plan JSON whose assigned slots are kept.
    #[arg(long)]
    pub from: Option<String>,

    /// Proposed plan JSON used when the recipe pool is large.
    #[arg(long)]
    pub proposal: Option<String>,

    /// User body weight in kg, forwarded with proposal requests.
    #[arg(long)]
    pub weight: Option<f64>,

    /// Write the plan as JSON.
    #[arg(long)]
    pub out: Option<String>,

    /// Write the plan as CSV.
    #[arg(long)]
    pub csv: Option<String>,
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan(PlanArgs {
            days: 1,
            meals: 3,
            protocol: "standard".to_string(),
            ..PlanArgs::default()
        })
    }
}
