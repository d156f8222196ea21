use lazy_static::lazy_static;

use crate::models::DayOfWeek;

// Static exercise catalog, grouped by body part. This is shared reference
// data embedded into every generation prompt; the order of the groups and
// of the exercises inside each group is stable.
lazy_static! {
    pub static ref EXERCISE_CATALOG: Vec<(&'static str, Vec<&'static str>)> = vec![
        (
            "Chest",
            vec![
                "Barbell Bench Press",
                "Incline Dumbbell Press",
                "Decline Bench Press",
                "Dumbbell Flyes",
                "Cable Crossover",
                "Push-Ups",
                "Chest Dips",
                "Machine Chest Press",
            ],
        ),
        (
            "Back",
            vec![
                "Deadlift",
                "Pull-Ups",
                "Bent-Over Barbell Row",
                "Lat Pulldown",
                "Seated Cable Row",
                "T-Bar Row",
                "Single-Arm Dumbbell Row",
                "Face Pulls",
                "Back Extensions",
            ],
        ),
        (
            "Biceps",
            vec![
                "Barbell Curl",
                "Dumbbell Curl",
                "Hammer Curl",
                "Preacher Curl",
                "Concentration Curl",
                "Cable Curl",
                "Incline Dumbbell Curl",
                "EZ-Bar Curl",
            ],
        ),
        (
            "Triceps",
            vec![
                "Close-Grip Bench Press",
                "Tricep Dips",
                "Skull Crushers",
                "Overhead Tricep Extension",
                "Tricep Pushdown",
                "Diamond Push-Ups",
                "Dumbbell Kickbacks",
                "Cable Overhead Extension",
            ],
        ),
        (
            "Shoulders",
            vec![
                "Overhead Press",
                "Arnold Press",
                "Lateral Raises",
                "Front Raises",
                "Rear Delt Flyes",
                "Upright Rows",
                "Seated Dumbbell Press",
                "Cable Lateral Raises",
            ],
        ),
        (
            "Legs",
            vec![
                "Barbell Squat",
                "Leg Press",
                "Romanian Deadlift",
                "Walking Lunges",
                "Leg Extensions",
                "Leg Curls",
                "Calf Raises",
                "Bulgarian Split Squats",
                "Hip Thrusts",
                "Goblet Squats",
            ],
        ),
    ];
}

// Function to look up the catalog entry for a body part (case-insensitive)
pub fn exercises_for(body_part: &str) -> Option<&'static [&'static str]> {
    EXERCISE_CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(body_part.trim()))
        .map(|(_, exercises)| exercises.as_slice())
}

// Fixed day-of-week split used when the user has no scheduled workout
pub fn body_parts_for_day(day: DayOfWeek) -> &'static [&'static str] {
    match day {
        DayOfWeek::Monday => &["Back", "Biceps"],
        DayOfWeek::Tuesday => &["Chest", "Triceps"],
        DayOfWeek::Wednesday => &["Legs"],
        DayOfWeek::Thursday => &["Shoulders", "Triceps", "Biceps"],
        DayOfWeek::Friday => &["Chest", "Back"],
        DayOfWeek::Saturday => &["Legs"],
        DayOfWeek::Sunday => &["Shoulders"],
    }
}
