/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{
    Cli, Commands, ExerciseCommand, FoodCommand, MealPlanCommand, OutputFormat, RegisterArgs,
    SummaryCommand,
};
pub use commands::{handle_command, list_endpoints, print_response};
