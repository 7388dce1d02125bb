use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::models::{RatingCreate, RatingResponse};
use crate::routes::AppState;

const MAX_COMMENT_CHARS: usize = 300;

/// Handler for recording a recipe rating
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<i64>,
    Json(rating): Json<RatingCreate>,
) -> AppResult<Json<RatingResponse>> {
    if !(1..=5).contains(&rating.stars) {
        return Err(AppError::InvalidInput(
            "stars must be between 1 and 5".to_string(),
        ));
    }
    if let Some(comment) = &rating.comment {
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(AppError::InvalidInput(format!(
                "comment must be at most {} characters",
                MAX_COMMENT_CHARS
            )));
        }
    }

    let inserted = state
        .store
        .insert_rating(recipe_id, rating.stars, rating.comment)
        .await?;

    if !inserted {
        return Err(AppError::NotFound("Recipe not found".to_string()));
    }

    Ok(Json(RatingResponse { success: true }))
}
