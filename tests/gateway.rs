//! Gateway behavior against a simulated backend

use anyhow::Result;
use athyra::api::{ApiGateway, ApiResponse, AuthResponse, NewUser, PreviousMeal};
use athyra::session::Username;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> ApiGateway {
    ApiGateway::with_base_url(server.uri()).unwrap()
}

fn user(name: &str) -> Option<Username> {
    Some(Username::parse(name).unwrap())
}

#[tokio::test]
async fn test_login_not_found_yields_detail() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "User not found."})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let response = gateway.login("ghost").await;

    assert_eq!(response, ApiResponse::Error("User not found.".to_string()));
    assert_eq!(gateway.current_user(), None);
    Ok(())
}

#[tokio::test]
async fn test_register_success_yields_data() -> Result<()> {
    let server = MockServer::start().await;
    let new_user = NewUser {
        username: "Bob".to_string(),
        age: 30,
        sex: "male".to_string(),
        height_cm: 180,
        weight_kg: 80,
        goal: "lose".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/register"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "username": "Bob",
            "age": 30,
            "sex": "male",
            "height_cm": 180,
            "weight_kg": 80,
            "goal": "lose"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "bob"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = gateway_for(&server).register(&new_user).await;
    assert_eq!(
        response,
        ApiResponse::Data(AuthResponse {
            status: None,
            username: "bob".to_string(),
        })
    );
    assert_eq!(
        serde_json::to_value(&response)?,
        json!({"data": {"username": "bob"}})
    );
    Ok(())
}

#[tokio::test]
async fn test_identity_header_only_after_set_user() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "age": 28,
            "sex": "female",
            "height_cm": 165,
            "weight_kg": 60,
            "goal": "maintain"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.get_profile().await;
    gateway.set_user(user("Alice"));
    let response = gateway.get_profile().await;
    assert_eq!(response.data().map(|p| p.age), Some(28));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("x-username").is_none());
    assert_eq!(
        requests[1].headers.get("x-username").unwrap().to_str()?,
        "alice"
    );
    Ok(())
}

#[tokio::test]
async fn test_image_upload_is_multipart() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze_food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "A fresh red apple",
            "calories": 95,
            "saved": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.set_user(user("alice"));
    let response = gateway.analyze_food(b"\xFF\xD8\xFFfake-jpeg".to_vec()).await;
    assert_eq!(response.data().map(|a| a.calories), Some(95));

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request.headers.get("content-type").unwrap().to_str()?;
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="image""#));
    assert!(body.contains(r#"filename="food.jpg""#));
    assert!(body.contains("fake-jpeg"));
    Ok(())
}

#[tokio::test]
async fn test_voice_upload_uses_audio_field() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/voice_command"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"action": "start_exercise"})),
        )
        .mount(&server)
        .await;

    let response = gateway_for(&server)
        .process_voice_command(b"webm-bytes".to_vec())
        .await;
    assert_eq!(response, ApiResponse::Data(json!({"action": "start_exercise"})));

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="audio""#));
    assert!(body.contains(r#"filename="voice_command.webm""#));
    Ok(())
}

#[tokio::test]
async fn test_exercise_start_and_stop_share_route() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/exercise"))
        .and(body_json(json!({"action": "start", "exercise_type": "running"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "exercise_started", "session_id": 7})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/exercise"))
        .and(body_json(json!({"action": "stop", "session_id": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "exercise_stopped",
            "duration_seconds": 1800,
            "calories_burned": 352
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.set_user(user("alice"));

    let started = gateway.start_exercise(None).await.into_result()?;
    assert_eq!(started.session_id, 7);

    let stopped = gateway.stop_exercise(started.session_id).await.into_result()?;
    assert_eq!(stopped.calories_burned, 352);
    Ok(())
}

#[tokio::test]
async fn test_log_previous_sends_type_key() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/log_previous"))
        .and(body_json(json!({"type": "food", "description": "Oatmeal", "calories": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "logged",
            "description": "Oatmeal",
            "calories": 150
        })))
        .expect(1)
        .mount(&server)
        .await;

    let meal = PreviousMeal {
        kind: "food".to_string(),
        description: "Oatmeal".to_string(),
        calories: 150,
    };
    let logged = gateway_for(&server).log_previous(&meal).await.into_result()?;
    assert_eq!(logged.status, "logged");
    Ok(())
}

#[tokio::test]
async fn test_malformed_error_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let response = gateway_for(&server).get_daily_summary().await;
    assert_eq!(response, ApiResponse::Error("Request failed".to_string()));
}

#[tokio::test]
async fn test_active_meal_plan_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_active_meal_plan"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "No active meal plan found."})),
        )
        .mount(&server)
        .await;

    let response = gateway_for(&server).get_active_meal_plan().await;
    assert_eq!(response.error(), Some("No active meal plan found."));
    assert!(response.data().is_none());
}

#[tokio::test]
async fn test_in_band_error_on_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/log_food_direct"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": "AI format error. Got: 'pizza'."})),
        )
        .mount(&server)
        .await;

    let response = gateway_for(&server).log_food_direct(vec![1, 2, 3]).await;
    assert_eq!(response.error(), Some("AI format error. Got: 'pizza'."));
}

#[tokio::test]
async fn test_transport_failure_is_an_error_envelope() {
    // nothing listens on the discard port
    let gateway = ApiGateway::with_base_url("http://127.0.0.1:9").unwrap();
    let response = gateway.get_streak_data().await;

    assert!(response.is_error());
    assert!(!response.error().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_do_not_cross() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "username": "alice",
                    "consumed_today": 1200,
                    "target_calories": 2000,
                    "remaining_calories": 800,
                    "goal": "maintain"
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/macro_summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"protein": 90})))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.set_user(user("alice"));

    // the macro summary resolves first even though it was issued second
    let (summary, macros) = tokio::join!(gateway.get_daily_summary(), gateway.get_macro_summary());

    assert_eq!(summary.into_result()?.remaining_calories, 800);
    assert_eq!(macros, ApiResponse::Data(json!({"protein": 90})));
    Ok(())
}

#[tokio::test]
async fn test_meal_plan_list_and_status() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_all_meal_plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"plan_id": 2, "created_at": "2025-01-02T08:00:00", "plan_data": {"days": []}},
            {"plan_id": 1, "created_at": "2025-01-01T08:00:00", "plan_data": {"days": []}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meal_plan_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "no_active_plan",
            "last_generated": null,
            "plan_id": null
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create_meal_plan"))
        .and(body_json(json!({"budget": 75.0, "allergies": "peanuts,shellfish"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"plan": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.set_user(user("alice"));

    let plans = gateway.get_all_meal_plans().await.into_result()?;
    assert_eq!(plans.iter().map(|p| p.plan_id).collect::<Vec<_>>(), vec![2, 1]);

    let status = gateway.get_meal_plan_status().await.into_result()?;
    assert_eq!(status.plan_id, None);

    let created: Value = gateway
        .create_meal_plan(75.0, "peanuts,shellfish")
        .await
        .into_result()?;
    assert_eq!(created, json!({"plan": "ok"}));
    Ok(())
}
