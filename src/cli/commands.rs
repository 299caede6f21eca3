use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::{
    api::{ApiResponse, AuthResponse, Endpoint, NewUser, PayloadKind, PreviousMeal},
    app::{init_config, AppContext},
    session::{SessionState, Username},
};

use super::{
    Commands, ExerciseCommand, FoodCommand, MealPlanCommand, OutputFormat, RegisterArgs,
    SummaryCommand,
};

/// Handle CLI subcommands; `Ok(false)` when the backend reported an error
pub async fn handle_command(
    command: &Commands,
    context: &AppContext,
    format: OutputFormat,
) -> Result<bool> {
    if let Some(route) = command.route() {
        if let Err(e) = context.navigator.navigate(route) {
            report_error(&e.to_string());
            return Ok(false);
        }
    }

    let api = &context.api;
    match command {
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration ready at {}", path.display());
            Ok(true)
        }
        Commands::Whoami => {
            show_session(&context.session.state());
            Ok(true)
        }
        Commands::Endpoints => {
            list_endpoints();
            Ok(true)
        }
        Commands::Register(args) => register(args, context, format).await,
        Commands::Login { username } => {
            if let Err(e) = Username::parse(username) {
                report_error(&e.to_string());
                return Ok(false);
            }
            let response = api.login(username).await;
            complete_sign_in(response, context, format).await
        }
        Commands::Logout => {
            context.sign_out().await;
            println!("{}", "Signed out".green());
            Ok(true)
        }
        Commands::Profile => print_response(&api.get_profile().await, format),
        Commands::Food(food) => match food {
            FoodCommand::Analyze { image } => {
                let bytes = read_upload(image).await?;
                print_response(&api.analyze_food(bytes).await, format)
            }
            FoodCommand::Log { image } => {
                let bytes = read_upload(image).await?;
                print_response(&api.log_food_direct(bytes).await, format)
            }
            FoodCommand::LogPrevious {
                description,
                calories,
                kind,
            } => {
                let meal = PreviousMeal {
                    kind: kind.clone(),
                    description: description.clone(),
                    calories: *calories,
                };
                print_response(&api.log_previous(&meal).await, format)
            }
        },
        Commands::Voice { audio } => {
            let bytes = read_upload(audio).await?;
            print_response(&api.process_voice_command(bytes).await, format)
        }
        Commands::Summary(summary) => match summary {
            SummaryCommand::Daily => print_response(&api.get_daily_summary().await, format),
            SummaryCommand::Macros => print_response(&api.get_macro_summary().await, format),
            SummaryCommand::Exercise => print_response(&api.get_exercise_summary().await, format),
            SummaryCommand::Streak => print_response(&api.get_streak_data().await, format),
        },
        Commands::Exercise(exercise) => match exercise {
            ExerciseCommand::Start { exercise_type } => {
                let response = api.start_exercise(exercise_type.as_deref()).await;
                print_response(&response, format)
            }
            ExerciseCommand::Stop { session_id } => {
                print_response(&api.stop_exercise(*session_id).await, format)
            }
        },
        Commands::MealPlan(plan) => match plan {
            MealPlanCommand::Create { budget, allergies } => {
                print_response(&api.create_meal_plan(*budget, allergies).await, format)
            }
            MealPlanCommand::Active => print_response(&api.get_active_meal_plan().await, format),
            MealPlanCommand::List => print_response(&api.get_all_meal_plans().await, format),
            MealPlanCommand::Status => print_response(&api.get_meal_plan_status().await, format),
        },
    }
}

async fn register(args: &RegisterArgs, context: &AppContext, format: OutputFormat) -> Result<bool> {
    if let Err(e) = Username::parse(&args.username) {
        report_error(&e.to_string());
        return Ok(false);
    }

    let user = NewUser {
        username: args.username.clone(),
        age: args.age,
        sex: args.sex.clone(),
        height_cm: args.height_cm,
        weight_kg: args.weight_kg,
        goal: args.goal.clone(),
    };
    let response = context.api.register(&user).await;
    complete_sign_in(response, context, format).await
}

/// Sign in with the name the server confirmed
async fn complete_sign_in(
    response: ApiResponse<AuthResponse>,
    context: &AppContext,
    format: OutputFormat,
) -> Result<bool> {
    if let ApiResponse::Data(auth) = &response {
        context.sign_in(&auth.username).await;
    }

    match (format, &response) {
        (OutputFormat::Text, ApiResponse::Data(_)) => {
            show_session(&context.session.state());
            Ok(true)
        }
        _ => print_response(&response, format),
    }
}

async fn read_upload(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Print an envelope; returns whether it carried data
pub fn print_response<T: Serialize>(response: &ApiResponse<T>, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
        OutputFormat::Text => match response {
            ApiResponse::Data(data) => println!("{}", serde_json::to_string_pretty(data)?),
            ApiResponse::Error(message) => report_error(message),
        },
    }
    Ok(response.is_data())
}

fn report_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

fn show_session(state: &SessionState) {
    match state.identity() {
        Some(user) => println!("Signed in as {}", user.as_str().green()),
        None => println!("{}", "Not signed in".yellow()),
    }
}

/// List the backend endpoint catalog
pub fn list_endpoints() {
    println!("Backend endpoints:");
    for endpoint in Endpoint::ALL {
        let payload = match endpoint.payload() {
            PayloadKind::None => "-".to_string(),
            PayloadKind::Json => "json".to_string(),
            PayloadKind::Multipart { field } => format!("multipart:{}", field),
        };
        println!(
            "  • {:<6} {:<22} {:<16} {:?}",
            endpoint.method().as_str(),
            endpoint.path(),
            payload,
            endpoint
        );
    }
}
