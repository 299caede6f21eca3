use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::endpoints::{Endpoint, PayloadKind};
use super::envelope::ApiResponse;
use super::types::{
    AuthResponse, DailySummary, ExerciseRequest, ExerciseStarted, ExerciseStopped, FoodAnalysis,
    LoggedMeal, LoginRequest, MealPlanRecord, MealPlanRequest, MealPlanStatus, NewUser,
    PreviousMeal, Profile,
};
use crate::app::ApiConfig;
use crate::constants::{
    AUDIO_FILE_NAME, AUDIO_MIME, IMAGE_FILE_NAME, IMAGE_MIME, REQUEST_FAILED_MESSAGE,
    USERNAME_HEADER,
};
use crate::session::{SessionState, Username};
use crate::utils::AthyraError;

/// Payload attached to a single request
enum RequestBody {
    Empty,
    Json(Value),
    File {
        bytes: Vec<u8>,
        file_name: &'static str,
        mime: &'static str,
    },
}

/// Error body the backend sends with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// The single chokepoint for backend traffic
///
/// Every endpoint method resolves to an [`ApiResponse`]; transport failures,
/// error statuses and undecodable bodies all become `ApiResponse::Error`.
pub struct ApiGateway {
    client: Client,
    base_url: String,
    current_user: RwLock<Option<Username>>,
}

impl ApiGateway {
    /// Create a gateway from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, AthyraError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        // no timeout unless configured
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            current_user: RwLock::new(None),
        })
    }

    /// Create a gateway for `base_url` with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, AthyraError> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the identity sent as `X-Username`; last write wins
    pub fn set_user(&self, user: Option<Username>) {
        debug!(
            "Gateway identity set to {}",
            user.as_ref().map(Username::as_str).unwrap_or("<none>")
        );
        *self.current_user.write() = user;
    }

    pub fn current_user(&self) -> Option<Username> {
        self.current_user.read().clone()
    }

    /// Mirror session transitions into the gateway identity
    ///
    /// The task applies the current state immediately and then every change,
    /// and ends when the session store is dropped.
    pub fn follow_session(
        self: &Arc<Self>,
        mut session: watch::Receiver<SessionState>,
    ) -> JoinHandle<()> {
        let gateway = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let identity = session.borrow_and_update().identity().cloned();
                gateway.set_user(identity);
                if session.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    // Auth endpoints

    pub async fn register(&self, user: &NewUser) -> ApiResponse<AuthResponse> {
        self.send_json(Endpoint::Register, user).await
    }

    pub async fn login(&self, username: &str) -> ApiResponse<AuthResponse> {
        let body = LoginRequest {
            username: username.to_string(),
        };
        self.send_json(Endpoint::Login, &body).await
    }

    pub async fn get_profile(&self) -> ApiResponse<Profile> {
        self.request(Endpoint::Profile, RequestBody::Empty).await
    }

    // Food tracking endpoints

    /// Recognize a meal without logging it
    pub async fn analyze_food(&self, image: Vec<u8>) -> ApiResponse<FoodAnalysis> {
        self.request(Endpoint::AnalyzeFood, image_body(image)).await
    }

    /// Recognize a meal and log it in one step
    pub async fn log_food_direct(&self, image: Vec<u8>) -> ApiResponse<FoodAnalysis> {
        self.request(Endpoint::LogFoodDirect, image_body(image)).await
    }

    pub async fn log_previous(&self, meal: &PreviousMeal) -> ApiResponse<LoggedMeal> {
        self.send_json(Endpoint::LogPrevious, meal).await
    }

    // Voice command endpoint

    pub async fn process_voice_command(&self, audio: Vec<u8>) -> ApiResponse<Value> {
        let body = RequestBody::File {
            bytes: audio,
            file_name: AUDIO_FILE_NAME,
            mime: AUDIO_MIME,
        };
        self.request(Endpoint::VoiceCommand, body).await
    }

    // Stats endpoints

    pub async fn get_daily_summary(&self) -> ApiResponse<DailySummary> {
        self.request(Endpoint::DailySummary, RequestBody::Empty).await
    }

    pub async fn get_macro_summary(&self) -> ApiResponse<Value> {
        self.request(Endpoint::MacroSummary, RequestBody::Empty).await
    }

    pub async fn get_exercise_summary(&self) -> ApiResponse<Value> {
        self.request(Endpoint::ExerciseSummary, RequestBody::Empty).await
    }

    pub async fn get_streak_data(&self) -> ApiResponse<Value> {
        self.request(Endpoint::StreakData, RequestBody::Empty).await
    }

    // Exercise endpoints

    /// Start a workout; `None` means running
    pub async fn start_exercise(&self, exercise_type: Option<&str>) -> ApiResponse<ExerciseStarted> {
        self.send_json(Endpoint::StartExercise, &ExerciseRequest::start(exercise_type))
            .await
    }

    pub async fn stop_exercise(&self, session_id: i64) -> ApiResponse<ExerciseStopped> {
        self.send_json(Endpoint::StopExercise, &ExerciseRequest::Stop { session_id })
            .await
    }

    // Meal planning endpoints

    pub async fn create_meal_plan(&self, budget: f64, allergies: &str) -> ApiResponse<Value> {
        let body = MealPlanRequest {
            budget,
            allergies: allergies.to_string(),
        };
        self.send_json(Endpoint::CreateMealPlan, &body).await
    }

    pub async fn get_active_meal_plan(&self) -> ApiResponse<Value> {
        self.request(Endpoint::ActiveMealPlan, RequestBody::Empty).await
    }

    pub async fn get_all_meal_plans(&self) -> ApiResponse<Vec<MealPlanRecord>> {
        self.request(Endpoint::AllMealPlans, RequestBody::Empty).await
    }

    pub async fn get_meal_plan_status(&self) -> ApiResponse<MealPlanStatus> {
        self.request(Endpoint::MealPlanStatus, RequestBody::Empty).await
    }

    async fn send_json<B, T>(&self, endpoint: Endpoint, body: &B) -> ApiResponse<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match serde_json::to_value(body) {
            Ok(value) => self.request(endpoint, RequestBody::Json(value)).await,
            Err(e) => ApiResponse::Error(e.to_string()),
        }
    }

    /// Shared request pipeline: attach identity, encode, send, normalize
    async fn request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: RequestBody,
    ) -> ApiResponse<T> {
        let request = match self.build(endpoint, body) {
            Ok(request) => request,
            Err(e) => return ApiResponse::Error(e.to_string()),
        };

        debug!("{} {}", endpoint.method(), endpoint.path());
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} failed to send: {}", endpoint.path(), e);
                return ApiResponse::Error(e.to_string());
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{} failed while reading body: {}", endpoint.path(), e);
                return ApiResponse::Error(e.to_string());
            }
        };

        if !status.is_success() {
            let message = error_message(&bytes);
            warn!("{} returned {}: {}", endpoint.path(), status, message);
            return ApiResponse::Error(message);
        }

        decode_success(endpoint, &bytes)
    }

    fn build(&self, endpoint: Endpoint, body: RequestBody) -> Result<RequestBuilder, AthyraError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let mut request = self.client.request(endpoint.method(), url);

        if let Some(user) = self.current_user.read().as_ref() {
            request = request.header(USERNAME_HEADER, user.as_str());
        }

        let request = match (endpoint.payload(), body) {
            (_, RequestBody::Empty) => request,
            // `.json` sets Content-Type: application/json
            (_, RequestBody::Json(value)) => request.json(&value),
            (PayloadKind::Multipart { field }, RequestBody::File { bytes, file_name, mime }) => {
                let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
                // boundary and Content-Type come from the transport
                request.multipart(Form::new().part(field, part))
            }
            (kind, RequestBody::File { .. }) => {
                return Err(AthyraError::InvalidInput(format!(
                    "{} does not accept file uploads ({:?})",
                    endpoint.path(),
                    kind
                )));
            }
        };

        Ok(request)
    }
}

fn image_body(image: Vec<u8>) -> RequestBody {
    RequestBody::File {
        bytes: image,
        file_name: IMAGE_FILE_NAME,
        mime: IMAGE_MIME,
    }
}

/// Message for a non-2xx response: the `detail` field, else the fallback
fn error_message(body: &[u8]) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail);

    match detail {
        Some(Value::String(text)) if !text.is_empty() => text,
        Some(Value::Null) | Some(Value::String(_)) | None => REQUEST_FAILED_MESSAGE.to_string(),
        // validation errors arrive as structured detail
        Some(other) => other.to_string(),
    }
}

/// Decode a 2xx body into `T`
///
/// Some handlers answer 2xx with `{"error": "..."}`; when such a body does
/// not fit `T`, the server message becomes the envelope error.
fn decode_success<T: DeserializeOwned>(endpoint: Endpoint, body: &[u8]) -> ApiResponse<T> {
    match serde_json::from_slice::<T>(body) {
        Ok(data) => ApiResponse::Data(data),
        Err(decode_err) => {
            let in_band = serde_json::from_slice::<ErrorBody>(body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|value| value.as_str().map(str::to_string));
            let message = in_band.unwrap_or_else(|| {
                format!("Unexpected response from {}: {}", endpoint.path(), decode_err)
            });
            warn!("{} returned an unusable body: {}", endpoint.path(), message);
            ApiResponse::Error(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(error_message(br#"{"detail": "User not found."}"#), "User not found.");
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(b"<html>502</html>"), REQUEST_FAILED_MESSAGE);
        assert_eq!(error_message(b""), REQUEST_FAILED_MESSAGE);
        assert_eq!(error_message(br#"{"message": "nope"}"#), REQUEST_FAILED_MESSAGE);
        assert_eq!(error_message(br#"{"detail": ""}"#), REQUEST_FAILED_MESSAGE);
        assert_eq!(error_message(br#"{"detail": null}"#), REQUEST_FAILED_MESSAGE);
    }

    #[test]
    fn test_error_message_structured_detail() {
        let message = error_message(br#"{"detail": [{"loc": ["body", "age"]}]}"#);
        assert!(message.contains("age"));
    }

    #[test]
    fn test_decode_in_band_error() {
        let response: ApiResponse<FoodAnalysis> = decode_success(
            Endpoint::AnalyzeFood,
            br#"{"error": "AI format error."}"#,
        );
        assert_eq!(response, ApiResponse::Error("AI format error.".to_string()));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let response: ApiResponse<Value> = decode_success(Endpoint::DailySummary, b"not json");
        let message = response.error().unwrap();
        assert!(message.contains("/summary"));
    }

    #[test]
    fn test_decode_untyped_keeps_error_body_as_data() {
        let response: ApiResponse<Value> =
            decode_success(Endpoint::MacroSummary, br#"{"error": "soft failure"}"#);
        assert!(response.is_data());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let gateway = ApiGateway::with_base_url("http://localhost:8000/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000");
        assert_eq!(gateway.current_user(), None);
    }
}
