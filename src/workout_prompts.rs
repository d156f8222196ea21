use crate::exercise_catalog::{body_parts_for_day, exercises_for};
use crate::models::{TrainingExperience, UserAttributes};

pub const HIGH_INTENSITY: &str = "High Intensity";
pub const MODERATE_INTENSITY: &str = "Moderate Intensity";
pub const LIGHT_INTENSITY: &str = "Light Intensity";

/// Intensity derived from the daily step count. The comparisons here are
/// the source of truth; the "7000-10000" band in the prompt wording is
/// descriptive only and intentionally left as-is.
pub fn intensity_for_steps(step_count: u32) -> &'static str {
    if step_count < 5000 {
        HIGH_INTENSITY
    } else if step_count > 7000 {
        LIGHT_INTENSITY
    } else {
        MODERATE_INTENSITY
    }
}

/// Rest-period range by training experience
pub fn rest_period_for(experience: TrainingExperience) -> &'static str {
    match experience {
        TrainingExperience::Beginner => "90-120 seconds",
        TrainingExperience::Intermediate => "60-90 seconds",
        TrainingExperience::Expert => "30-60 seconds",
    }
}

/// Body parts this request targets: the scheduled ones when the weekly
/// schedule applies, otherwise the fixed day-of-week split.
pub fn target_body_parts(attrs: &UserAttributes) -> Vec<String> {
    match &attrs.scheduled_workout {
        Some(scheduled) => scheduled.body_parts.clone(),
        None => body_parts_for_day(attrs.current_day)
            .iter()
            .map(|part| part.to_string())
            .collect(),
    }
}

/// Renders the natural-language prompt sent to the generation service.
///
/// Two variants share the same structure: the scheduled variant names the
/// body parts from today's weekly-schedule entry, the default variant
/// derives them from the day-of-week split. Both embed the guideline
/// tables and the catalog rows for the target body parts, and both pin
/// down the reply format the parser expects.
pub fn render_prompt(attrs: &UserAttributes) -> String {
    let intensity = intensity_for_steps(attrs.step_count);
    let rest_period = rest_period_for(attrs.training_experience);
    let body_parts = target_body_parts(attrs);

    let mut prompt = String::new();

    prompt.push_str("You are a professional fitness coach creating a personalized workout plan.\n\n");

    prompt.push_str("Client profile:\n");
    prompt.push_str(&format!(
        "- Training experience: {}\n",
        attrs.training_experience
    ));
    prompt.push_str(&format!("- Steps walked today: {}\n\n", attrs.step_count));

    prompt.push_str("Intensity guidelines based on daily steps:\n");
    prompt.push_str("- Under 5000 steps: High Intensity training\n");
    prompt.push_str("- 5000-7000 steps: Moderate Intensity training\n");
    prompt.push_str("- 7000-10000 steps: Light Intensity training\n");
    prompt.push_str(&format!(
        "Today's session is {} training.\n\n",
        intensity
    ));

    prompt.push_str("Rest period guidelines by experience level:\n");
    prompt.push_str("- Beginner: 90-120 seconds between sets\n");
    prompt.push_str("- Intermediate: 60-90 seconds between sets\n");
    prompt.push_str("- Expert: 30-60 seconds between sets\n");
    prompt.push_str(&format!(
        "Use rest periods of {} between sets.\n\n",
        rest_period
    ));

    match &attrs.scheduled_workout {
        Some(scheduled) => {
            prompt.push_str(&format!(
                "The client has a workout scheduled today at {} targeting: {}.\n\n",
                scheduled.workout_time,
                body_parts.join(" & ")
            ));
        }
        None => {
            prompt.push_str(&format!(
                "No workout is scheduled for today. Follow the standard {} split targeting: {}.\n\n",
                attrs.current_day,
                body_parts.join(" & ")
            ));
        }
    }

    prompt.push_str("Available exercises:\n");
    for part in &body_parts {
        if let Some(exercises) = exercises_for(part) {
            prompt.push_str(&format!("{}: {}\n", part, exercises.join(", ")));
        }
    }
    prompt.push('\n');

    prompt.push_str(
        "Create exactly 3 distinct workout options using only exercises from the listed body parts. \
         Include 3-4 exercises per body part in each option, and do not repeat the same combination \
         of exercises across options.\n\n",
    );

    prompt.push_str("Format each option exactly like this:\n");
    prompt.push_str("Workout 1:\n");
    prompt.push_str("1. Exercise Name\n");
    prompt.push_str("- Sets and reps (for example: 3 sets of 10-12 reps)\n");
    prompt.push_str("- Rest period between sets\n");
    prompt.push_str("- One short form tip\n");

    prompt
}
