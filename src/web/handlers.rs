//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::providers::CapabilityKind;
use crate::results::Record;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters for product searches
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search text
    pub search: Option<String>,
    /// Maximum number of products, kept raw so bad values get our own error
    pub limit: Option<String>,
}

/// Search results envelope
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub items: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl SearchResponse {
    fn new(query: String, items: Vec<Record>) -> Self {
        Self {
            query,
            total: items.len(),
            items,
            city: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub display_name: String,
    pub kind: CapabilityKind,
    /// Timeout in seconds
    pub timeout: f64,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
    pub cities: BTreeMap<String, Vec<String>>,
}

impl SearchParams {
    /// The search text, required and non-blank
    fn query(&self) -> Result<String, ApiError> {
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q.to_string()),
            _ => Err(ApiError::bad_request("Parameter 'search' is required")),
        }
    }

    /// The requested limit, or `default`; must lie in `1..=max`
    fn limit(&self, default: usize, max: usize) -> Result<usize, ApiError> {
        let out_of_range = || ApiError::bad_request(format!("Parameter 'limit' must be between 1 and {max}"));
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => default,
            Some(raw) => raw.parse::<usize>().map_err(|_| out_of_range())?,
        };
        if limit == 0 || limit > max {
            return Err(out_of_range());
        }
        Ok(limit)
    }
}

/// `GET /products/search`
pub async fn search_all(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.query()?;
    let limits = state.limits();
    let limit = params.limit(limits.default_limit, limits.max_limit)?;

    let items = state.search.search_all(&query, limit).await?;
    Ok(Json(SearchResponse::new(query, items)))
}

/// `GET /products/search/{provider}`
pub async fn search_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    state.search.registry().lookup(&provider)?;
    let query = params.query()?;
    let limits = state.limits();
    let limit = params.limit(limits.default_provider_limit, limits.max_limit)?;

    let items = state.search.search_provider(&provider, &query, limit).await?;
    Ok(Json(SearchResponse::new(query, items)))
}

/// `GET /products/city/{city}`
pub async fn search_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    state.search.cities().providers_for(&city)?;
    let query = params.query()?;
    let limits = state.limits();
    let limit = params.limit(limits.default_provider_limit, limits.max_limit)?;

    let items = state.search.search_city(&city, &query, limit).await?;
    let mut response = SearchResponse::new(query, items);
    response.city = Some(city.trim().to_lowercase());
    Ok(Json(response))
}

/// `GET /providers`
pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = state
        .search
        .registry()
        .entries()
        .map(|entry| ProviderInfo {
            name: entry.key.clone(),
            display_name: entry.profile.display_name.clone(),
            kind: entry.kind(),
            timeout: entry.timeout.as_secs_f64(),
        })
        .collect();

    let cities = state
        .search
        .cities()
        .cities()
        .map(|(city, keys)| (city.to_string(), keys.to_vec()))
        .collect();

    Json(ProvidersResponse { providers, cities })
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "instance_name": state.instance_name(),
        "metrics": state.search.metrics().snapshot(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
