use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::{handlers, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Branch routes; shift settings live under their branch
    let branch_routes = Router::new()
        .route("/", get(handlers::branches_handler::get_branches))
        .route("/", post(handlers::branches_handler::create_branch))
        .route("/{branchCode}", get(handlers::branches_handler::get_branch))
        .route(
            "/{branchCode}/shift-settings",
            get(handlers::settings_handler::get_shift_settings),
        )
        .route(
            "/{branchCode}/shift-settings",
            post(handlers::settings_handler::create_shift_settings),
        )
        .route(
            "/{branchCode}/shift-settings",
            put(handlers::settings_handler::update_shift_settings),
        )
        .route(
            "/{branchCode}/shift-settings",
            delete(handlers::settings_handler::delete_shift_settings),
        );

    // Reference routes
    let reference_routes = Router::new().route(
        "/shift-kinds",
        get(handlers::references_handler::get_shift_kinds),
    );

    // Therapist routes
    let therapist_routes = Router::new()
        .route("/", get(handlers::therapists_handler::get_therapists))
        .route("/", post(handlers::therapists_handler::create_therapist))
        .route("/{id}", put(handlers::therapists_handler::update_therapist));

    // Schedule routes
    let schedule_routes = Router::new()
        .route("/", get(handlers::schedule_handler::get_schedules))
        .route("/assign", post(handlers::schedule_handler::assign_shift))
        .route("/unassign", post(handlers::schedule_handler::unassign_shift))
        .route("/validate", get(handlers::schedule_handler::validate_schedule))
        .route("/occupancy", get(handlers::schedule_handler::get_occupancy))
        .route("/clear-day", post(handlers::schedule_handler::clear_day))
        .route("/clear-range", post(handlers::schedule_handler::clear_range))
        .route(
            "/copy-previous-week",
            post(handlers::schedule_handler::copy_previous_week),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/branches", branch_routes)
        .nest("/api/references", reference_routes)
        .nest("/api/therapists", therapist_routes)
        .nest("/api/schedules", schedule_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(cors)
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ShiftGrid API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
    "#)
}
