use utoipa::OpenApi;

use crate::models::{ExerciseSummary, Workout};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::history_page,
        crate::handlers::workout_list,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready
    ),
    components(schemas(Workout, ExerciseSummary)),
    tags(
        (name = "history", description = "Workout history view"),
        (name = "health", description = "Liveness and readiness probes")
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_history_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/"));
        assert!(doc.paths.paths.contains_key("/workouts/list"));
        assert!(doc.paths.paths.contains_key("/healthz/ready"));
    }
}
