pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::auth::{handlers as auth_handlers, middleware::authenticate};
use crate::candidates::handlers as candidate_handlers;
use crate::dashboard::handlers as dashboard_handlers;
use crate::jobs::handlers as job_handlers;
use crate::screening::handlers as screening_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Owner-scoped routes sit behind the session middleware; the public
    // application surface (active-posting fetch, application submit, auth
    // bootstrap) is merged in without it.
    let protected = Router::new()
        .route(
            "/api/job-postings",
            get(job_handlers::list_postings).post(job_handlers::create_posting),
        )
        .route(
            "/api/job-postings/:id",
            put(job_handlers::update_posting)
                .patch(job_handlers::set_posting_active)
                .delete(job_handlers::delete_posting),
        )
        .route(
            "/api/job-postings/:id/edit",
            get(job_handlers::get_posting_for_edit),
        )
        .route(
            "/api/job-postings/:id/toggle-active",
            post(job_handlers::toggle_posting_active),
        )
        .route(
            "/api/job-postings/:id/candidates",
            get(candidate_handlers::list_posting_candidates),
        )
        .route("/api/candidates", get(candidate_handlers::list_candidates))
        .route("/api/candidates/:id", get(candidate_handlers::get_candidate))
        .route(
            "/api/candidates/:id/status",
            put(candidate_handlers::update_status),
        )
        .route(
            "/api/candidates/:id/notes",
            put(candidate_handlers::update_notes),
        )
        .route(
            "/api/ai-screenings/:id/process",
            post(screening_handlers::process_screening),
        )
        .route("/api/dashboard", get(dashboard_handlers::get_dashboard))
        .route("/api/users/me", get(auth_handlers::get_current_user))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/oauth/:provider/redirect_url",
            get(auth_handlers::get_oauth_redirect_url),
        )
        .route("/api/sessions", post(auth_handlers::create_session))
        .route("/api/logout", get(auth_handlers::logout))
        .route("/api/job-postings/:id", get(job_handlers::get_public_posting))
        .route(
            "/api/job-postings/:id/candidates",
            post(candidate_handlers::submit_application),
        );

    protected.merge(public).with_state(state)
}
