use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::RecipeFilter;
use crate::error::{AppError, AppResult};
use crate::models::{total_pages, PageParams, Recipe, RecipeDetail};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub cuisine: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

/// Handler for the paginated recipe list. List items carry no ingredient
/// detail, the detail endpoint does.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRecipesQuery>,
) -> AppResult<Json<RecipeListResponse>> {
    let page = PageParams::from_query(query.page, query.page_size);
    page.validate()?;

    let filter = RecipeFilter {
        search: query.search,
        cuisine: query.cuisine,
    };
    let (recipes, total) = state.store.list_recipes(filter, page).await?;

    Ok(Json(RecipeListResponse {
        recipes,
        total,
        page: page.page,
        page_size: page.page_size,
        total_pages: total_pages(total, page.page_size),
    }))
}

/// Handler for a recipe detail lookup with ingredient quantities
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeDetail>> {
    let detail = state
        .store
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))?;

    Ok(Json(detail))
}
