use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One workout session as returned by `GET /workouts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Workout {
    #[schema(example = "2024-01-10")]
    pub workout_date: String,
    pub num_exercises: u32,
    pub total_volume: f64,
    pub exercises: Vec<ExerciseSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ExerciseSummary {
    pub name: String,
    pub num_sets: u32,
    pub max_weight: f64,
    pub total_reps: u32,
}
