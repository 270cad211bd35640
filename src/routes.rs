// src/routes.rs

use axum::{
    Router, http::Method,
    middleware,
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessment, feed, interaction, profile},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (assessments, attempts, feed, profile).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store handles + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // let governor_conf = GovernorConfigBuilder::default()
    //     .per_second(2)
    //     .burst_size(5)
    //     .finish()
    //     .unwrap();

    // let governor_conf = Arc::new(governor_conf);

    // Public catalogue routes.
    let assessment_routes = Router::new()
        .route("/", get(assessment::list_assessments))
        .route("/{id}", get(assessment::get_assessment));

    // Everything below requires a verified Bearer token.
    let attempt_routes = Router::new()
        .route("/submit-test", post(assessment::submit_test))
        .route("/attempts", get(assessment::list_my_attempts))
        .route("/results/{id}", get(assessment::get_results));

    let social_routes = Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/posts/{id}/like", post(interaction::toggle_like))
        .route("/posts/{id}/comments", post(interaction::create_comment))
        .route(
            "/profile",
            get(profile::get_me).put(profile::update_profile),
        )
        .route("/users/{username}", get(profile::get_user_page));

    let protected = attempt_routes.merge(social_routes).layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    Router::new()
        .nest("/api/assessments", assessment_routes)
        .nest("/api", protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // .layer(GovernorLayer::new(governor_conf))
        .with_state(state)
}
