use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::error::AppResult;
use crate::middleware::RequestId;
use crate::models::{MealPlan, UserProfile};
use crate::routes::AppState;

/// Handler for the meal recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<MealPlan>> {
    tracing::info!(
        request_id = %request_id,
        daily_calories = profile.daily_calories,
        taste_tag_count = profile.taste_tags.len(),
        "Processing recommendation request"
    );

    let plan = state.recommender.recommend(&*state.store, &profile).await?;

    Ok(Json(plan))
}
