use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::navigation::Route;

#[derive(Parser, Debug)]
#[command(name = "athyra")]
#[command(version)]
#[command(about = "Command-line client for the Athyra fitness and nutrition tracker", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the backend base URL
    #[arg(long, global = true, env = "ATHYRA_API_URL")]
    pub api_url: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Output format for responses
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init,
    /// Show the signed-in user
    Whoami,
    /// List every backend endpoint
    Endpoints,
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign in as an existing user
    Login {
        /// Username (case-insensitive)
        username: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the profile of the signed-in user
    Profile,
    /// Food logging
    #[command(subcommand)]
    Food(FoodCommand),
    /// Send a recorded voice command
    Voice {
        /// Audio file (webm)
        audio: PathBuf,
    },
    /// Progress summaries
    #[command(subcommand)]
    Summary(SummaryCommand),
    /// Exercise sessions
    #[command(subcommand)]
    Exercise(ExerciseCommand),
    /// Meal planning
    #[command(subcommand)]
    MealPlan(MealPlanCommand),
}

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    pub username: String,
    #[arg(long)]
    pub age: u32,
    #[arg(long)]
    pub sex: String,
    #[arg(long)]
    pub height_cm: u32,
    #[arg(long)]
    pub weight_kg: u32,
    /// e.g. lose, maintain, gain
    #[arg(long)]
    pub goal: String,
}

#[derive(Subcommand, Debug)]
pub enum FoodCommand {
    /// Recognize a meal photo without logging it
    Analyze { image: PathBuf },
    /// Recognize a meal photo and log it
    Log { image: PathBuf },
    /// Log a meal analyzed earlier
    LogPrevious {
        #[arg(long)]
        description: String,
        #[arg(long)]
        calories: i64,
        #[arg(long, default_value = "food")]
        kind: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SummaryCommand {
    /// Calories consumed against today's target
    Daily,
    /// Macro breakdown
    Macros,
    /// Exercise totals
    Exercise,
    /// Logging streak
    Streak,
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommand {
    /// Start an exercise session
    Start {
        /// Exercise type (defaults to running)
        #[arg(long = "type")]
        exercise_type: Option<String>,
    },
    /// Stop an exercise session
    Stop { session_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum MealPlanCommand {
    /// Generate a new meal plan
    Create {
        #[arg(long, default_value_t = 100.0)]
        budget: f64,
        /// Comma-separated allergies
        #[arg(long, default_value = "")]
        allergies: String,
    },
    /// Show the active plan
    Active,
    /// List every plan
    List,
    /// Show plan generation status
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Text,
    /// The raw `{data}` / `{error}` envelope
    Json,
}

impl Commands {
    /// Screen the command stands in for; `None` for local-only commands
    pub fn route(&self) -> Option<Route> {
        match self {
            Self::Init | Self::Whoami | Self::Endpoints | Self::Logout => None,
            Self::Register(_) => Some(Route::Register),
            Self::Login { .. } => Some(Route::Login),
            Self::Profile | Self::Summary(_) => Some(Route::Progress),
            Self::Food(_) | Self::Voice { .. } => Some(Route::Camera),
            Self::Exercise(_) => Some(Route::Coach),
            Self::MealPlan(_) => Some(Route::Planner),
        }
    }
}
