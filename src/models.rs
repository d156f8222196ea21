use std::collections::HashMap;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

// Training experience levels stored on the user profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TrainingExperience {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl TrainingExperience {
    // Parses the label stored in Firestore, falling back to None for
    // anything unrecognized
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Beginner" => Some(TrainingExperience::Beginner),
            "Intermediate" => Some(TrainingExperience::Intermediate),
            "Expert" => Some(TrainingExperience::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for TrainingExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrainingExperience::Beginner => "Beginner",
            TrainingExperience::Intermediate => "Intermediate",
            TrainingExperience::Expert => "Expert",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DayOfWeek {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{}", label)
    }
}

/// A workout entry from the user's weekly schedule that applies to today
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkout {
    pub body_parts: Vec<String>,
    pub workout_time: String,
}

/// Flattened, normalized view of the user's stored attributes. Built once
/// per request by the profile resolver and consumed by the prompt renderer
/// and the response parser.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    pub step_count: u32,
    pub training_experience: TrainingExperience,
    pub current_day: DayOfWeek,
    pub scheduled_workout: Option<ScheduledWorkout>,
}

impl Default for UserAttributes {
    fn default() -> Self {
        Self {
            step_count: 0,
            training_experience: TrainingExperience::Beginner,
            current_day: DayOfWeek::Monday,
            scheduled_workout: None,
        }
    }
}

/// One exercise parsed out of the generation-service reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets_and_reps: String,
    pub rest_period: String,
    pub form_tips: String,
}

/// One of the alternative workout plans parsed from a single reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutOption {
    pub id: u32,
    pub exercises: Vec<Exercise>,
}

/// Headline values for the plan. Intensity and rest periods are derived
/// from the user attributes, never read back from the generated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub title: String,
    pub subtitle: String,
    pub intensity: String,
    pub step_count: u32,
    pub rest_periods: String,
    pub scheduled_workout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_parts: Option<Vec<String>>,
}

/// Full response payload for the create-workout endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub summary: WorkoutSummary,
    pub workout_options: Vec<WorkoutOption>,
}

/// Profile record as stored in the user's profile subcollection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<i64>,
    pub gender: Option<String>,
    pub experience: Option<String>,
    pub daily_steps: Option<i64>,
    pub weekly_steps: Option<i64>,
    pub last_reset_date: Option<String>,
    pub profile_completed: Option<bool>,
}

/// Per-day entry in the weekly schedule document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub is_workout_day: bool,
    #[serde(default)]
    pub body_parts: Vec<String>,
    pub workout_time: Option<String>,
}

/// Weekly schedule document, keyed by calendar date (`YYYY-MM-DD`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub days: HashMap<String, ScheduleDay>,
}
