use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{error, info};

use crate::errors::{WorkoutError, WorkoutResult};
use crate::flowise_client::WorkoutGenerator;
use crate::models::WorkoutPlan;
use crate::profile_resolver::{ProfileStore, resolve_user_attributes};
use crate::workout_parser::parse_workout_response;
use crate::workout_prompts::render_prompt;

/// App state for the workout workflow
pub struct WorkoutAppState {
    pub store: Arc<dyn ProfileStore>,
    pub generator: Arc<dyn WorkoutGenerator>,
}

/// Full create-workout workflow: resolve the profile into attributes,
/// render the prompt, call the generation service, parse the reply.
/// The generation service is never called when the profile lookup fails,
/// and the parser never runs when the generation call fails.
pub async fn build_workout_plan(
    store: &dyn ProfileStore,
    generator: &dyn WorkoutGenerator,
    user_id: &str,
) -> WorkoutResult<WorkoutPlan> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(WorkoutError::Validation("userId is required".to_string()));
    }

    let attrs = resolve_user_attributes(store, user_id).await?;
    let prompt = render_prompt(&attrs);
    let raw_text = generator.generate(&prompt).await?;

    Ok(parse_workout_response(&raw_text, &attrs))
}

/// POST /api/users/{user_id}/create-workout
pub async fn create_workout_handler(
    path: web::Path<String>,
    data: web::Data<WorkoutAppState>,
) -> Result<HttpResponse, WorkoutError> {
    let user_id = path.into_inner();
    info!("Creating workout for user {}", user_id);

    let plan = build_workout_plan(data.store.as_ref(), data.generator.as_ref(), &user_id)
        .await
        .map_err(|e| {
            error!("Failed to create workout for {}: {}", user_id, e);
            e
        })?;

    info!(
        "Parsed {} workout options for user {}",
        plan.workout_options.len(),
        user_id
    );

    Ok(HttpResponse::Created().json(json!({
        "message": "Workout created successfully",
        "workoutPlan": plan,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserProfile, WeeklySchedule};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubStore {
        profile: Option<UserProfile>,
    }

    #[async_trait]
    impl ProfileStore for StubStore {
        async fn fetch_profile(&self, user_id: &str) -> WorkoutResult<UserProfile> {
            self.profile
                .clone()
                .ok_or_else(|| WorkoutError::NotFound(user_id.to_string()))
        }

        async fn fetch_weekly_schedule(
            &self,
            _user_id: &str,
        ) -> WorkoutResult<Option<WeeklySchedule>> {
            Ok(None)
        }

        async fn fetch_latest_step_count(&self, _user_id: &str) -> WorkoutResult<Option<u32>> {
            Ok(None)
        }
    }

    struct StubGenerator {
        reply: WorkoutResult<String>,
        called: AtomicBool,
    }

    impl StubGenerator {
        fn returning(reply: WorkoutResult<String>) -> Self {
            Self {
                reply,
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl WorkoutGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> WorkoutResult<String> {
            self.called.store(true, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(WorkoutError::UpstreamUnavailable {
                    status: 500,
                    message: "generation failed".to_string(),
                }),
            }
        }
    }

    fn known_profile() -> Option<UserProfile> {
        Some(UserProfile {
            experience: Some("Beginner".to_string()),
            daily_steps: Some(3000),
            ..UserProfile::default()
        })
    }

    #[tokio::test]
    async fn test_missing_profile_skips_generation_call() {
        let store = StubStore { profile: None };
        let generator = StubGenerator::returning(Ok("Workout 1:\n".to_string()));

        let result = build_workout_plan(&store, &generator, "ghost").await;
        assert!(matches!(result, Err(WorkoutError::NotFound(_))));
        assert!(!generator.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_blank_user_id_is_rejected() {
        let store = StubStore {
            profile: known_profile(),
        };
        let generator = StubGenerator::returning(Ok(String::new()));

        let result = build_workout_plan(&store, &generator, "   ").await;
        assert!(matches!(result, Err(WorkoutError::Validation(_))));
        assert!(!generator.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let store = StubStore {
            profile: known_profile(),
        };
        let generator = StubGenerator::returning(Err(WorkoutError::UpstreamUnavailable {
            status: 500,
            message: "down".to_string(),
        }));

        let result = build_workout_plan(&store, &generator, "user-1").await;
        assert!(matches!(
            result,
            Err(WorkoutError::UpstreamUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_happy_path_returns_parsed_plan() {
        let reply = concat!(
            "Workout 1:\n",
            "1. Barbell Curl\n",
            "- 3 sets of 10 reps\n",
            "- 90-120 seconds\n",
            "- Keep your elbows pinned\n",
        );
        let store = StubStore {
            profile: known_profile(),
        };
        let generator = StubGenerator::returning(Ok(reply.to_string()));

        let plan = build_workout_plan(&store, &generator, "user-1")
            .await
            .expect("workflow should succeed");

        assert!(generator.called.load(Ordering::SeqCst));
        assert_eq!(plan.workout_options.len(), 1);
        assert_eq!(plan.workout_options[0].exercises[0].name, "Barbell Curl");
        // 3000 steps, Beginner
        assert_eq!(plan.summary.intensity, "High Intensity");
        assert_eq!(plan.summary.rest_periods, "90-120 seconds");
    }
}
