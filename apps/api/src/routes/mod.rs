pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::applications::handlers as applications;
use crate::companies::handlers as companies;
use crate::description::handlers as description;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Companies
        .route(
            "/companies",
            get(companies::handle_list_companies).post(companies::handle_create_company),
        )
        .route(
            "/companies/:id",
            get(companies::handle_get_company)
                .put(companies::handle_update_company)
                .delete(companies::handle_delete_company),
        )
        // Job postings
        .route(
            "/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/jobs/:job_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Description generation
        .route(
            "/jobs/:job_id/description",
            post(description::handle_generate_description).get(description::handle_get_description),
        )
        // Applications
        .route(
            "/jobs/:job_id/applications",
            post(applications::handle_submit_application)
                .get(applications::handle_list_applications),
        )
        .with_state(state)
}
