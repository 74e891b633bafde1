use axum::{routing::get, Router};

use super::handlers::{self, healthz, livez};
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/market-summary", get(handlers::market_summary))
        .route("/api/salaries", get(handlers::salaries))
        .route("/api/locations", get(handlers::locations))
        .route("/api/location-insights", get(handlers::location_insights))
        .route("/api/skills", get(handlers::skills))
        .route("/api/skills/:skill/impact", get(handlers::skill_impact))
        .route("/api/companies", get(handlers::companies))
        .route("/api/remote", get(handlers::remote))
        .route("/api/compare", get(handlers::compare))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state)
}
