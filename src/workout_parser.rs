use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Exercise, UserAttributes, WorkoutOption, WorkoutPlan, WorkoutSummary};
use crate::workout_prompts::{intensity_for_steps, rest_period_for};

lazy_static! {
    // "Workout <N>:" section markers, case-sensitive, N a positive integer
    static ref SECTION_MARKER: Regex = Regex::new(r"Workout [1-9][0-9]*:").unwrap();
    // Numbered line carrying the exercise name
    static ref NAME_LINE: Regex = Regex::new(r"^[0-9]+\.\s*(.+)$").unwrap();
}

/// Builds the plan summary from the resolved attributes. Intensity and
/// rest periods are always derived here, never taken from the generated
/// text.
pub fn build_summary(attrs: &UserAttributes) -> WorkoutSummary {
    let intensity = intensity_for_steps(attrs.step_count);
    let rest_periods = rest_period_for(attrs.training_experience);

    let (title, scheduled_workout, body_parts) = match &attrs.scheduled_workout {
        Some(scheduled) => (
            format!("{} Workout Options", scheduled.body_parts.join("&")),
            true,
            Some(scheduled.body_parts.clone()),
        ),
        None => (
            format!("{}'s Workout Options", attrs.current_day),
            false,
            None,
        ),
    };

    WorkoutSummary {
        title,
        subtitle: format!("{} training with {} rest periods", intensity, rest_periods),
        intensity: intensity.to_string(),
        step_count: attrs.step_count,
        rest_periods: rest_periods.to_string(),
        scheduled_workout,
        body_parts,
    }
}

/// Parses the free-text generation reply into structured workout options.
///
/// The text is split on "Workout <N>:" markers (anything before the first
/// marker is discarded) and each section is scanned for exercise blocks: a
/// numbered name line followed by exactly three dash-prefixed detail lines
/// in fixed order (sets/reps, rest period, form tips). Sections without a
/// single well-formed block are dropped. A reply that yields no exercises
/// at all produces an empty option list, which is a valid outcome.
pub fn parse_workout_response(raw_text: &str, attrs: &UserAttributes) -> WorkoutPlan {
    let markers: Vec<_> = SECTION_MARKER.find_iter(raw_text).collect();

    let mut sections = Vec::new();
    for (index, marker) in markers.iter().enumerate() {
        let section_end = markers
            .get(index + 1)
            .map_or(raw_text.len(), |next| next.start());
        let exercises = parse_exercises(&raw_text[marker.end()..section_end]);
        if !exercises.is_empty() {
            sections.push(exercises);
        }
    }

    let workout_options = sections
        .into_iter()
        .enumerate()
        .map(|(index, exercises)| WorkoutOption {
            id: index as u32 + 1,
            exercises,
        })
        .collect();

    WorkoutPlan {
        summary: build_summary(attrs),
        workout_options,
    }
}

// Scans one section for exercise blocks. A malformed block (fewer than
// three dash lines) is skipped without aborting the rest of the section.
fn parse_exercises(section: &str) -> Vec<Exercise> {
    let lines: Vec<&str> = section.lines().collect();
    let mut exercises = Vec::new();

    let mut index = 0;
    while index < lines.len() {
        let line = lines[index].trim();

        let name = match NAME_LINE.captures(line) {
            Some(captures) => captures[1].trim().to_string(),
            None => {
                index += 1;
                continue;
            }
        };

        let details: Vec<&str> = lines[index + 1..]
            .iter()
            .take(3)
            .map(|detail| detail.trim())
            .take_while(|detail| detail.starts_with('-'))
            .collect();

        if details.len() < 3 {
            index += 1;
            continue;
        }

        exercises.push(Exercise {
            name,
            sets_and_reps: strip_dash(details[0]),
            rest_period: strip_dash(details[1]),
            form_tips: strip_dash(details[2]),
        });
        index += 4;
    }

    exercises
}

fn strip_dash(line: &str) -> String {
    line.trim().trim_start_matches('-').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayOfWeek, ScheduledWorkout, TrainingExperience};

    fn sample_reply() -> String {
        concat!(
            "Here is your personalized plan based on the guidelines.\n",
            "\n",
            "Workout 1:\n",
            "1. Barbell Bench Press\n",
            "   - 4 sets of 8-10 reps\n",
            "   - 90-120 seconds\n",
            "   - Keep your shoulder blades retracted\n",
            "2. Incline Dumbbell Press\n",
            "   - 3 sets of 10-12 reps\n",
            "   - 90-120 seconds\n",
            "   - Control the weight on the way down\n",
            "3. Cable Crossover\n",
            "   - 3 sets of 12-15 reps\n",
            "   - 90-120 seconds\n",
            "   - Squeeze your chest at the midpoint\n",
            "\n",
            "Workout 2:\n",
            "1. Push-Ups\n",
            "   - 4 sets of 15 reps\n",
            "   - 90-120 seconds\n",
            "   - Keep your core tight\n",
            "2. Dumbbell Flyes\n",
            "   - 3 sets of 12 reps\n",
            "   - 90-120 seconds\n",
            "   - Slight bend in the elbows\n",
            "3. Chest Dips\n",
            "   - 3 sets of 10 reps\n",
            "   - 90-120 seconds\n",
            "   - Lean forward to target the chest\n",
        )
        .to_string()
    }

    #[test]
    fn test_two_section_round_trip() {
        let attrs = UserAttributes::default();
        let plan = parse_workout_response(&sample_reply(), &attrs);

        assert_eq!(plan.workout_options.len(), 2);
        assert_eq!(plan.workout_options[0].id, 1);
        assert_eq!(plan.workout_options[1].id, 2);
        for option in &plan.workout_options {
            assert_eq!(option.exercises.len(), 3);
        }

        let first = &plan.workout_options[0].exercises[0];
        assert_eq!(first.name, "Barbell Bench Press");
        assert_eq!(first.sets_and_reps, "4 sets of 8-10 reps");
        assert_eq!(first.rest_period, "90-120 seconds");
        assert_eq!(first.form_tips, "Keep your shoulder blades retracted");

        let last = &plan.workout_options[1].exercises[2];
        assert_eq!(last.name, "Chest Dips");
        assert_eq!(last.form_tips, "Lean forward to target the chest");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let attrs = UserAttributes {
            step_count: 6000,
            training_experience: TrainingExperience::Intermediate,
            ..UserAttributes::default()
        };
        let reply = sample_reply();
        assert_eq!(
            parse_workout_response(&reply, &attrs),
            parse_workout_response(&reply, &attrs)
        );
    }

    #[test]
    fn test_malformed_block_is_skipped_not_fatal() {
        let reply = concat!(
            "Workout 1:\n",
            "1. Barbell Curl\n",
            "   - 3 sets of 10 reps\n",
            "   - 60-90 seconds\n",
            // form tip line missing, block is malformed
            "2. Hammer Curl\n",
            "   - 3 sets of 12 reps\n",
            "   - 60-90 seconds\n",
            "   - Keep your elbows pinned\n",
            "Workout 2:\n",
            "1. Preacher Curl\n",
            "   - 4 sets of 8 reps\n",
            "   - 60-90 seconds\n",
            "   - Full range of motion\n",
        );

        let plan = parse_workout_response(reply, &UserAttributes::default());
        assert_eq!(plan.workout_options.len(), 2);
        assert_eq!(plan.workout_options[0].exercises.len(), 1);
        assert_eq!(plan.workout_options[0].exercises[0].name, "Hammer Curl");
        assert_eq!(plan.workout_options[1].exercises[0].name, "Preacher Curl");
    }

    #[test]
    fn test_empty_sections_are_dropped_and_ids_stay_sequential() {
        let reply = concat!(
            "Workout 1:\n",
            "Rest day, no exercises today.\n",
            "Workout 2:\n",
            "1. Deadlift\n",
            "   - 5 sets of 5 reps\n",
            "   - 90-120 seconds\n",
            "   - Keep your back neutral\n",
            "Workout 3:\n",
            "1. Pull-Ups\n",
            "   - 3 sets of 8 reps\n",
            "   - 90-120 seconds\n",
            "   - Pull your chin over the bar\n",
        );

        let plan = parse_workout_response(reply, &UserAttributes::default());
        assert_eq!(plan.workout_options.len(), 2);
        assert_eq!(plan.workout_options[0].id, 1);
        assert_eq!(plan.workout_options[0].exercises[0].name, "Deadlift");
        assert_eq!(plan.workout_options[1].id, 2);
    }

    #[test]
    fn test_preamble_before_first_marker_is_discarded() {
        let reply = concat!(
            "1. This numbered line sits before any marker\n",
            "- and looks like\n",
            "- an exercise block\n",
            "- but must be ignored\n",
            "Workout 1:\n",
            "1. Leg Press\n",
            "   - 3 sets of 12 reps\n",
            "   - 90-120 seconds\n",
            "   - Do not lock out your knees\n",
        );

        let plan = parse_workout_response(reply, &UserAttributes::default());
        assert_eq!(plan.workout_options.len(), 1);
        assert_eq!(plan.workout_options[0].exercises.len(), 1);
        assert_eq!(plan.workout_options[0].exercises[0].name, "Leg Press");
    }

    #[test]
    fn test_no_exercises_yields_empty_plan_not_error() {
        let plan =
            parse_workout_response("Sorry, I cannot help with that.", &UserAttributes::default());
        assert!(plan.workout_options.is_empty());

        let plan = parse_workout_response("", &UserAttributes::default());
        assert!(plan.workout_options.is_empty());
    }

    #[test]
    fn test_default_title_uses_current_day() {
        let attrs = UserAttributes {
            current_day: DayOfWeek::Monday,
            ..UserAttributes::default()
        };
        let summary = build_summary(&attrs);
        assert_eq!(summary.title, "Monday's Workout Options");
        assert!(!summary.scheduled_workout);
        assert!(summary.body_parts.is_none());
    }

    #[test]
    fn test_scheduled_title_joins_body_parts() {
        let attrs = UserAttributes {
            scheduled_workout: Some(ScheduledWorkout {
                body_parts: vec!["Chest".to_string(), "Back".to_string()],
                workout_time: "18:00".to_string(),
            }),
            ..UserAttributes::default()
        };
        let summary = build_summary(&attrs);
        assert_eq!(summary.title, "Chest&Back Workout Options");
        assert!(summary.scheduled_workout);
        assert_eq!(
            summary.body_parts,
            Some(vec!["Chest".to_string(), "Back".to_string()])
        );
    }

    #[test]
    fn test_summary_values_are_derived_not_parsed() {
        let attrs = UserAttributes {
            step_count: 8000,
            training_experience: TrainingExperience::Expert,
            ..UserAttributes::default()
        };
        // The reply claims a different intensity and rest period; both
        // must be ignored in favor of the derived values
        let reply = concat!(
            "This is a High Intensity plan with 90-120 seconds rests.\n",
            "Workout 1:\n",
            "1. Overhead Press\n",
            "   - 3 sets of 8 reps\n",
            "   - 90-120 seconds\n",
            "   - Brace your core\n",
        );

        let plan = parse_workout_response(reply, &attrs);
        assert_eq!(plan.summary.intensity, "Light Intensity");
        assert_eq!(plan.summary.rest_periods, "30-60 seconds");
        assert_eq!(plan.summary.step_count, 8000);
    }
}
