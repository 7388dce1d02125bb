use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::IngredientFilter;
use crate::error::{AppError, AppResult};
use crate::models::{total_pages, Ingredient, PageParams};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListIngredientsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub has_nutrition: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct IngredientListResponse {
    pub ingredients: Vec<Ingredient>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

/// Handler for the paginated ingredient list
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListIngredientsQuery>,
) -> AppResult<Json<IngredientListResponse>> {
    let page = PageParams::from_query(query.page, query.page_size);
    page.validate()?;

    let filter = IngredientFilter {
        search: query.search,
        has_nutrition: query.has_nutrition,
    };
    let (ingredients, total) = state.store.list_ingredients(filter, page).await?;

    Ok(Json(IngredientListResponse {
        ingredients,
        total,
        page: page.page,
        page_size: page.page_size,
        total_pages: total_pages(total, page.page_size),
    }))
}

/// Handler for a single ingredient lookup
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ingredient>> {
    let ingredient = state
        .store
        .get_ingredient(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient not found".to_string()))?;

    Ok(Json(ingredient))
}
