use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_EXERCISE_TYPE;

/// Registration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub age: u32,
    pub sex: String,
    pub height_cm: u32,
    pub weight_kg: u32,
    /// Free-form goal, e.g. "lose", "maintain", "gain"
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Reply to `/register` and `/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Username as the server stored it
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub age: u32,
    pub sex: String,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub goal: String,
}

/// Result of recognizing a meal in a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub description: String,
    pub calories: i64,
    /// Whether the server already logged the meal
    #[serde(default)]
    pub saved: bool,
}

/// A meal analyzed earlier and logged now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousMeal {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub calories: i64,
}

impl From<FoodAnalysis> for PreviousMeal {
    fn from(analysis: FoodAnalysis) -> Self {
        Self {
            kind: "food".to_string(),
            description: analysis.description,
            calories: analysis.calories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMeal {
    pub status: String,
    pub description: String,
    pub calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub username: String,
    pub consumed_today: i64,
    pub target_calories: i64,
    pub remaining_calories: i64,
    pub goal: String,
}

/// Body of `POST /exercise`, discriminated by `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ExerciseRequest {
    Start { exercise_type: String },
    Stop { session_id: i64 },
}

impl ExerciseRequest {
    pub fn start(exercise_type: Option<&str>) -> Self {
        Self::Start {
            exercise_type: exercise_type.unwrap_or(DEFAULT_EXERCISE_TYPE).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStarted {
    pub status: String,
    pub session_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStopped {
    pub status: String,
    pub duration_seconds: i64,
    pub calories_burned: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub budget: f64,
    /// Comma-separated list, empty for none
    pub allergies: String,
}

/// One stored plan from `/get_all_meal_plans`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub plan_id: i64,
    pub created_at: String,
    pub plan_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanStatus {
    pub status: String,
    pub last_generated: Option<String>,
    pub plan_id: Option<i64>,
}
