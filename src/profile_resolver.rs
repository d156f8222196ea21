use async_trait::async_trait;
use chrono::{Datelike, Local};
use tracing::warn;

use crate::errors::WorkoutResult;
use crate::models::{
    DayOfWeek, ScheduledWorkout, TrainingExperience, UserAttributes, UserProfile, WeeklySchedule,
};

/// Read-only view of the profile store, implemented by the Firestore
/// client and by in-memory stubs in tests
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches the user's profile record, `NotFound` when none exists
    async fn fetch_profile(&self, user_id: &str) -> WorkoutResult<UserProfile>;

    /// Fetches the optional weekly-schedule document
    async fn fetch_weekly_schedule(&self, user_id: &str) -> WorkoutResult<Option<WeeklySchedule>>;

    /// Step count from the newest activity record, when one exists. Wins
    /// over the possibly stale profile field.
    async fn fetch_latest_step_count(&self, user_id: &str) -> WorkoutResult<Option<u32>>;
}

/// Resolves a user id into the normalized attribute set the rest of the
/// workflow consumes. Fails with `NotFound` when no profile record exists;
/// a failing schedule fetch is logged and treated as "no schedule".
pub async fn resolve_user_attributes(
    store: &dyn ProfileStore,
    user_id: &str,
) -> WorkoutResult<UserAttributes> {
    let profile = store.fetch_profile(user_id).await?;
    let latest_steps = store.fetch_latest_step_count(user_id).await?;

    // The schedule is an enhancement, not a requirement
    let schedule = match store.fetch_weekly_schedule(user_id).await {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!("Failed to fetch weekly schedule for {}: {}", user_id, e);
            None
        }
    };

    let now = Local::now();
    let date_key = now.format("%Y-%m-%d").to_string();
    let current_day = DayOfWeek::from_weekday(now.date_naive().weekday());

    Ok(build_attributes(
        &profile,
        schedule.as_ref(),
        latest_steps,
        &date_key,
        current_day,
    ))
}

/// Pure normalization step: applies defaults for absent fields and keeps
/// the schedule entry only when today is a workout day with at least one
/// body part.
pub fn build_attributes(
    profile: &UserProfile,
    schedule: Option<&WeeklySchedule>,
    latest_steps: Option<u32>,
    date_key: &str,
    current_day: DayOfWeek,
) -> UserAttributes {
    let step_count = latest_steps
        .or_else(|| {
            profile
                .daily_steps
                .and_then(|steps| u32::try_from(steps).ok())
        })
        .unwrap_or(0);

    let training_experience = profile
        .experience
        .as_deref()
        .and_then(TrainingExperience::from_label)
        .unwrap_or_default();

    let scheduled_workout = schedule
        .and_then(|schedule| schedule.days.get(date_key))
        .filter(|day| day.is_workout_day && !day.body_parts.is_empty())
        .map(|day| ScheduledWorkout {
            body_parts: day.body_parts.clone(),
            workout_time: day.workout_time.clone().unwrap_or_default(),
        });

    UserAttributes {
        step_count,
        training_experience,
        current_day,
        scheduled_workout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WorkoutError;
    use crate::models::ScheduleDay;
    use std::collections::HashMap;

    fn schedule_with(date_key: &str, day: ScheduleDay) -> WeeklySchedule {
        let mut days = HashMap::new();
        days.insert(date_key.to_string(), day);
        WeeklySchedule { days }
    }

    #[test]
    fn test_defaults_for_empty_profile() {
        let attrs = build_attributes(
            &UserProfile::default(),
            None,
            None,
            "2026-08-31",
            DayOfWeek::Monday,
        );
        assert_eq!(attrs, UserAttributes::default());
    }

    #[test]
    fn test_latest_activity_steps_win_over_profile_field() {
        let profile = UserProfile {
            daily_steps: Some(2000),
            ..UserProfile::default()
        };

        let attrs = build_attributes(&profile, None, Some(8400), "2026-08-31", DayOfWeek::Monday);
        assert_eq!(attrs.step_count, 8400);

        let attrs = build_attributes(&profile, None, None, "2026-08-31", DayOfWeek::Monday);
        assert_eq!(attrs.step_count, 2000);
    }

    #[test]
    fn test_schedule_applies_only_on_workout_days_with_body_parts() {
        let profile = UserProfile::default();

        let workout_day = schedule_with(
            "2026-08-31",
            ScheduleDay {
                is_workout_day: true,
                body_parts: vec!["Chest".to_string(), "Back".to_string()],
                workout_time: Some("18:00".to_string()),
            },
        );
        let attrs = build_attributes(
            &profile,
            Some(&workout_day),
            None,
            "2026-08-31",
            DayOfWeek::Monday,
        );
        let scheduled = attrs.scheduled_workout.expect("schedule should apply");
        assert_eq!(scheduled.body_parts, vec!["Chest", "Back"]);
        assert_eq!(scheduled.workout_time, "18:00");

        // Rest day entry does not apply
        let rest_day = schedule_with(
            "2026-08-31",
            ScheduleDay {
                is_workout_day: false,
                body_parts: vec!["Chest".to_string()],
                workout_time: None,
            },
        );
        let attrs = build_attributes(
            &profile,
            Some(&rest_day),
            None,
            "2026-08-31",
            DayOfWeek::Monday,
        );
        assert!(attrs.scheduled_workout.is_none());

        // Workout day without body parts does not apply either
        let empty_parts = schedule_with(
            "2026-08-31",
            ScheduleDay {
                is_workout_day: true,
                body_parts: vec![],
                workout_time: Some("18:00".to_string()),
            },
        );
        let attrs = build_attributes(
            &profile,
            Some(&empty_parts),
            None,
            "2026-08-31",
            DayOfWeek::Monday,
        );
        assert!(attrs.scheduled_workout.is_none());

        // Entry for a different date does not apply
        let attrs = build_attributes(
            &profile,
            Some(&workout_day),
            None,
            "2026-09-01",
            DayOfWeek::Tuesday,
        );
        assert!(attrs.scheduled_workout.is_none());
    }

    struct StubStore {
        profile: Option<UserProfile>,
        schedule: WorkoutResult<Option<WeeklySchedule>>,
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
            match &self.schedule {
                Ok(schedule) => Ok(schedule.clone()),
                Err(_) => Err(WorkoutError::Firestore("schedule fetch failed".to_string())),
            }
        }

        async fn fetch_latest_step_count(&self, _user_id: &str) -> WorkoutResult<Option<u32>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let store = StubStore {
            profile: None,
            schedule: Ok(None),
        };
        let result = resolve_user_attributes(&store, "missing-user").await;
        assert!(matches!(result, Err(WorkoutError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_schedule_fetch_failure_is_swallowed() {
        let store = StubStore {
            profile: Some(UserProfile {
                experience: Some("Expert".to_string()),
                daily_steps: Some(6500),
                ..UserProfile::default()
            }),
            schedule: Err(WorkoutError::Firestore("boom".to_string())),
        };

        let attrs = resolve_user_attributes(&store, "user-1")
            .await
            .expect("schedule failure must not fail the resolve");
        assert!(attrs.scheduled_workout.is_none());
        assert_eq!(attrs.step_count, 6500);
        assert_eq!(attrs.training_experience, TrainingExperience::Expert);
    }
}
