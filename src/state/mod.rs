mod library;
mod persistence;

pub use library::{LibraryFile, RecipeLibrary};
pub use persistence::{
    export_plan_csv, load_library, load_plan, load_proposal, load_targets, save_library, save_plan,
};
