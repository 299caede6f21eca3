use reqwest::Method;

use crate::constants::{AUDIO_FIELD, IMAGE_FIELD};

/// How an endpoint carries its request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    Json,
    /// `multipart/form-data` with a single binary field
    Multipart { field: &'static str },
}

/// Every operation the backend exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Register,
    Login,
    Profile,
    AnalyzeFood,
    LogFoodDirect,
    LogPrevious,
    VoiceCommand,
    DailySummary,
    MacroSummary,
    ExerciseSummary,
    StreakData,
    StartExercise,
    StopExercise,
    CreateMealPlan,
    ActiveMealPlan,
    AllMealPlans,
    MealPlanStatus,
}

impl Endpoint {
    pub const ALL: [Endpoint; 17] = [
        Endpoint::Register,
        Endpoint::Login,
        Endpoint::Profile,
        Endpoint::AnalyzeFood,
        Endpoint::LogFoodDirect,
        Endpoint::LogPrevious,
        Endpoint::VoiceCommand,
        Endpoint::DailySummary,
        Endpoint::MacroSummary,
        Endpoint::ExerciseSummary,
        Endpoint::StreakData,
        Endpoint::StartExercise,
        Endpoint::StopExercise,
        Endpoint::CreateMealPlan,
        Endpoint::ActiveMealPlan,
        Endpoint::AllMealPlans,
        Endpoint::MealPlanStatus,
    ];

    pub fn method(self) -> Method {
        match self {
            Self::Profile
            | Self::DailySummary
            | Self::MacroSummary
            | Self::ExerciseSummary
            | Self::StreakData
            | Self::ActiveMealPlan
            | Self::AllMealPlans
            | Self::MealPlanStatus => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::Login => "/login",
            Self::Profile => "/profile",
            Self::AnalyzeFood => "/analyze_food",
            Self::LogFoodDirect => "/log_food_direct",
            Self::LogPrevious => "/log_previous",
            Self::VoiceCommand => "/voice_command",
            Self::DailySummary => "/summary",
            Self::MacroSummary => "/macro_summary",
            Self::ExerciseSummary => "/exercise_summary",
            Self::StreakData => "/streak_data",
            // start and stop share one route, discriminated by `action`
            Self::StartExercise | Self::StopExercise => "/exercise",
            Self::CreateMealPlan => "/create_meal_plan",
            Self::ActiveMealPlan => "/get_active_meal_plan",
            Self::AllMealPlans => "/get_all_meal_plans",
            Self::MealPlanStatus => "/meal_plan_status",
        }
    }

    pub fn payload(self) -> PayloadKind {
        match self {
            Self::AnalyzeFood | Self::LogFoodDirect => PayloadKind::Multipart { field: IMAGE_FIELD },
            Self::VoiceCommand => PayloadKind::Multipart { field: AUDIO_FIELD },
            Self::Register
            | Self::Login
            | Self::LogPrevious
            | Self::StartExercise
            | Self::StopExercise
            | Self::CreateMealPlan => PayloadKind::Json,
            _ => PayloadKind::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gets_carry_no_payload() {
        for endpoint in Endpoint::ALL {
            if endpoint.method() == Method::GET {
                assert_eq!(endpoint.payload(), PayloadKind::None, "{:?}", endpoint);
            } else {
                assert_ne!(endpoint.payload(), PayloadKind::None, "{:?}", endpoint);
            }
        }
    }

    #[test]
    fn test_multipart_fields() {
        assert_eq!(
            Endpoint::AnalyzeFood.payload(),
            PayloadKind::Multipart { field: "image" }
        );
        assert_eq!(
            Endpoint::VoiceCommand.payload(),
            PayloadKind::Multipart { field: "audio" }
        );
    }

    #[test]
    fn test_paths_are_unique_except_exercise() {
        let mut paths: Vec<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Endpoint::ALL.len() - 1);
        assert_eq!(Endpoint::StopExercise.path(), Endpoint::StartExercise.path());
    }
}
