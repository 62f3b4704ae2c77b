//! Route configuration.

use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let agent_routes = Router::new()
        .route("/all", get(handlers::list_agents))
        .route(
            "/{id}",
            get(handlers::get_agent).delete(handlers::delete_agent),
        )
        .route("/{id}/download", get(handlers::download_agent))
        .route("/by-name/{name}", get(handlers::get_agent_by_name))
        .route("/by-load/{load}", get(handlers::get_agent_by_load))
        .route("/create", post(handlers::create_agent))
        .route("/upload", post(handlers::upload_agent));

    let env_template_routes = Router::new()
        .route(
            "/all",
            get(handlers::list_env_templates).delete(handlers::delete_all_env_templates),
        )
        .route(
            "/{id}",
            get(handlers::get_env_template).delete(handlers::delete_env_template),
        )
        .route("/by-name/{name}", get(handlers::get_env_template_by_name))
        .route("/create", post(handlers::create_env_template));

    let env_instance_routes = Router::new()
        .route(
            "/all",
            get(handlers::list_env_instances).delete(handlers::delete_all_env_instances),
        )
        .route(
            "/{id}",
            get(handlers::get_env_instance).delete(handlers::delete_env_instance),
        )
        .route("/by-name/{name}", get(handlers::get_env_instance_by_name))
        .route(
            "/by-template-id/{template_id}",
            get(handlers::list_env_instances_by_template),
        )
        .route("/create", post(handlers::create_env_instance))
        .route("/update", post(handlers::update_env_instance));

    let scheme_routes = Router::new()
        .route("/all", get(handlers::list_schemes))
        .route(
            "/{id}",
            get(handlers::get_scheme).delete(handlers::delete_scheme),
        )
        .route("/by-name/{name}", get(handlers::get_scheme_by_name))
        .route("/create", post(handlers::create_scheme));

    let plan_routes = Router::new()
        .route("/all", get(handlers::list_deduction_plans))
        .route(
            "/{id}",
            get(handlers::get_deduction_plan).delete(handlers::delete_deduction_plan),
        )
        .route("/by-name/{name}", get(handlers::get_deduction_plan_by_name))
        .route("/create", post(handlers::create_deduction_plan))
        .route("/update", post(handlers::update_deduction_plan));

    let task_log_routes = Router::new()
        .route("/all", get(handlers::list_task_logs))
        .route(
            "/{id}",
            get(handlers::get_task_log).delete(handlers::delete_task_log),
        )
        .route(
            "/by-task-id/{task_id}",
            get(handlers::list_task_logs_by_task),
        )
        .route("/create", post(handlers::create_task_log));

    let task_status_routes = Router::new()
        .route("/all", get(handlers::list_task_statuses))
        .route(
            "/{task_id}",
            get(handlers::get_task_status).delete(handlers::delete_task_status),
        )
        .route("/create", post(handlers::create_task_status))
        .route("/update", post(handlers::update_task_status));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/agent_meta", agent_routes)
        .nest("/env/template", env_template_routes)
        .nest("/env/instance", env_instance_routes)
        .nest("/scheme", scheme_routes)
        .nest("/deduction/plan", plan_routes)
        .nest("/deduction/task-log", task_log_routes)
        .nest("/deduction/task-status", task_status_routes);

    let prefix = state.config.server.normalized_prefix();
    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(&prefix, api_routes)
    };

    router
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Envelope 404 for unknown routes.
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

