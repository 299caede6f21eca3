// Gateway module for backend API - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod endpoints;
mod envelope;
mod types;

// Public re-exports - the ONLY way to access API functionality
pub use client::ApiGateway;
pub use endpoints::{Endpoint, PayloadKind};
pub use envelope::ApiResponse;
pub use types::{
    AuthResponse, DailySummary, ExerciseRequest, ExerciseStarted, ExerciseStopped, FoodAnalysis,
    LoggedMeal, LoginRequest, MealPlanRecord, MealPlanRequest, MealPlanStatus, NewUser,
    PreviousMeal, Profile,
};
