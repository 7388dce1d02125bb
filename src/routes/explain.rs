use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;
use crate::routes::AppState;

/// A recommended recipe to explain
#[derive(Debug, Deserialize)]
pub struct ExplainRecipe {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub macro_grams: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub user_profile: BTreeMap<String, Value>,
    pub recipes: Vec<ExplainRecipe>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Handler for the AI explanation endpoint. Upstream failures map to a
/// gateway error; there is no retry.
pub async fn explain(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> AppResult<Json<ExplainResponse>> {
    let profile_summary = request
        .user_profile
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join(", ");

    let recipe_summary = request
        .recipes
        .iter()
        .map(|recipe| format!("{} ({} kcal)", recipe.name, recipe.calories))
        .collect::<Vec<_>>()
        .join("; ");

    let explanation = state
        .explainer
        .generate_explanation(&profile_summary, &recipe_summary)
        .await?;

    Ok(Json(ExplainResponse { explanation }))
}
