//! Request handlers. Each one runs a single read transaction on the blocking pool.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

use super::state::AppState;
use crate::analysis;
use crate::models::{
    CompanyInsight, LocationInsight, LocationSalary, MarketSummary, RemoteTrend, SalaryComparison,
    SalaryInsights, SkillImpact, SkillStat,
};
use crate::store::{JobSelector, StoreError};

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("background task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn query<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&JobSelector<'_>) -> Result<T, StoreError> + Send + 'static,
{
    let store = state.store.clone();
    let value = tokio::task::spawn_blocking(move || store.read(f)).await??;
    Ok(Json(value))
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SalaryParams {
    pub location: Option<String>,
    pub skill: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    /// `;`-separated location filters.
    pub locations: Option<String>,
}

pub async fn livez() -> Result<(), ApiError> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<(), ApiError> {
    query(&state, |jobs| jobs.count_all()).await?;
    tracing::debug!("service is healthy");
    Ok(())
}

pub async fn market_summary(State(state): State<AppState>) -> ApiResult<MarketSummary> {
    query(&state, analysis::market_summary).await
}

pub async fn salaries(
    State(state): State<AppState>,
    Query(params): Query<SalaryParams>,
) -> ApiResult<SalaryInsights> {
    query(&state, move |jobs| {
        analysis::salary_insights(jobs, params.location.as_deref(), params.skill.as_deref())
    })
    .await
}

pub async fn locations(State(state): State<AppState>) -> ApiResult<Vec<LocationSalary>> {
    query(&state, analysis::salary_by_location).await
}

pub async fn location_insights(State(state): State<AppState>) -> ApiResult<Vec<LocationInsight>> {
    query(&state, analysis::location_insights).await
}

pub async fn skills(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Vec<SkillStat>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    query(&state, move |jobs| analysis::top_skills(jobs, limit)).await
}

pub async fn skill_impact(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> ApiResult<SkillImpact> {
    query(&state, move |jobs| analysis::skill_salary_impact(jobs, &skill)).await
}

pub async fn companies(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Vec<CompanyInsight>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    query(&state, move |jobs| analysis::company_insights(jobs, limit)).await
}

pub async fn remote(State(state): State<AppState>) -> ApiResult<Vec<RemoteTrend>> {
    query(&state, analysis::remote_work_trends).await
}

pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> ApiResult<Vec<SalaryComparison>> {
    let requested: Vec<String> = params
        .locations
        .as_deref()
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|location| !location.is_empty())
        .map(String::from)
        .collect();
    let locations = if requested.is_empty() {
        state.comparison_locations.as_ref().clone()
    } else {
        requested
    };

    query(&state, move |jobs| {
        analysis::salary_comparison(jobs, locations.as_slice())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{job, seed, temp_store};

    fn state_with_jobs() -> (tempfile::TempDir, AppState) {
        let (dir, store) = temp_store();
        seed(
            &store,
            &[
                job("Boston, MA", Some("Python, SQL"), Some((90000.0, 100000.0))),
                job("Portland, ME", Some("SQL"), Some((60000.0, 70000.0))),
                job("Austin, TX", Some("Java"), Some((70000.0, 80000.0))),
            ],
        );
        let state = AppState::new(store, vec!["Portland, ME".to_string()]);
        (dir, state)
    }

    #[tokio::test]
    async fn test_market_summary() {
        let (_dir, state) = state_with_jobs();

        let Json(summary) = market_summary(State(state)).await.unwrap();

        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.highest_paying_location, "Boston, MA");
    }

    #[tokio::test]
    async fn test_salaries_with_filters() {
        let (_dir, state) = state_with_jobs();
        let params = SalaryParams {
            location: None,
            skill: Some("sql".to_string()),
        };

        let Json(insights) = salaries(State(state), Query(params)).await.unwrap();

        assert_eq!(insights.count, 2);
        assert_eq!(insights.avg_salary, 80000);
    }

    #[tokio::test]
    async fn test_skills_limit() {
        let (_dir, state) = state_with_jobs();

        let Json(top) = skills(State(state.clone()), Query(LimitParams { limit: Some(1) }))
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].skill, "SQL");

        let Json(all) = skills(State(state), Query(LimitParams::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_compare_uses_request_or_configured_locations() {
        let (_dir, state) = state_with_jobs();

        let params = CompareParams {
            locations: Some("Austin; Boston ;".to_string()),
        };
        let Json(requested) = compare(State(state.clone()), Query(params)).await.unwrap();
        let names: Vec<&str> = requested.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(names, vec!["Boston", "Austin"]);

        let Json(configured) = compare(State(state), Query(CompareParams::default()))
            .await
            .unwrap();
        assert_eq!(configured.len(), 1);
        assert_eq!(configured[0].location, "Portland, ME");
    }

    #[tokio::test]
    async fn test_skill_impact() {
        let (_dir, state) = state_with_jobs();

        let Json(impact) = skill_impact(State(state), Path("Python".to_string()))
            .await
            .unwrap();

        assert_eq!(impact.average_salary, 95000);
        assert_eq!(impact.market_average, 70000);
        assert_eq!(impact.salary_difference, 25000);
    }

    #[tokio::test]
    async fn test_probes() {
        let (_dir, state) = state_with_jobs();

        assert!(livez().await.is_ok());
        assert!(healthz(State(state)).await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_server_error() {
        let (dir, store) = temp_store();
        let state = AppState::new(store, Vec::new());
        drop(dir);

        let err = remote(State(state)).await.unwrap_err();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
