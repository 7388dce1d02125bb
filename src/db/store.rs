use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::models::{Ingredient, PageParams, Recipe, RecipeDetail, RecipeIngredient};

/// Optional filters for the ingredient list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientFilter {
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Keep only ingredients with (or without) energy data
    pub has_nutrition: Option<bool>,
}

/// Optional filters for the recipe list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    /// Case-insensitive name substring
    pub search: Option<String>,
    /// Case-insensitive cuisine substring
    pub cuisine: Option<String>,
}

/// Data-access interface over the recipe catalog.
///
/// The recommendation core consumes `fetch_all_recipes` and
/// `fetch_rating_aggregate` as one logical snapshot per assembly; the
/// remaining operations back the query endpoints. Store failures propagate
/// unmodified, retrying is the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_ingredients(
        &self,
        filter: IngredientFilter,
        page: PageParams,
    ) -> AppResult<(Vec<Ingredient>, i64)>;

    async fn get_ingredient(&self, id: i64) -> AppResult<Option<Ingredient>>;

    async fn list_recipes(
        &self,
        filter: RecipeFilter,
        page: PageParams,
    ) -> AppResult<(Vec<Recipe>, i64)>;

    async fn get_recipe(&self, id: i64) -> AppResult<Option<RecipeDetail>>;

    /// Records a rating. Returns `false` when the recipe does not exist.
    async fn insert_rating(
        &self,
        recipe_id: i64,
        stars: i16,
        comment: Option<String>,
    ) -> AppResult<bool>;

    /// Full recipe pool read used by the recommendation engine
    async fn fetch_all_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Mean star value per rated recipe. Recipes without ratings are absent.
    async fn fetch_rating_aggregate(&self) -> AppResult<HashMap<i64, f64>>;
}

/// PostgreSQL-backed store
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Joined row for a recipe's ingredient list
#[derive(FromRow)]
struct IngredientLineRow {
    id: i64,
    name: String,
    energy_kcal: Option<f64>,
    protein_g: Option<f64>,
    fat_g: Option<f64>,
    carb_g: Option<f64>,
    fiber_g: Option<f64>,
    calcium_mg: Option<f64>,
    sodium_mg: Option<f64>,
    seasonality: Option<String>,
    quantity: f64,
}

impl From<IngredientLineRow> for RecipeIngredient {
    fn from(row: IngredientLineRow) -> Self {
        RecipeIngredient {
            ingredient: Ingredient {
                id: row.id,
                name: row.name,
                energy_kcal: row.energy_kcal,
                protein_g: row.protein_g,
                fat_g: row.fat_g,
                carb_g: row.carb_g,
                fiber_g: row.fiber_g,
                calcium_mg: row.calcium_mg,
                sodium_mg: row.sodium_mg,
                seasonality: row.seasonality,
            },
            quantity: row.quantity,
        }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_ingredients(
        &self,
        filter: IngredientFilter,
        page: PageParams,
    ) -> AppResult<(Vec<Ingredient>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM ingredients
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::BOOLEAN IS NULL OR (energy_kcal IS NOT NULL) = $2)
            "#,
        )
        .bind(&filter.search)
        .bind(filter.has_nutrition)
        .fetch_one(&self.pool)
        .await?;

        let ingredients = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, energy_kcal, protein_g, fat_g, carb_g,
                   fiber_g, calcium_mg, sodium_mg, seasonality
            FROM ingredients
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::BOOLEAN IS NULL OR (energy_kcal IS NOT NULL) = $2)
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.search)
        .bind(filter.has_nutrition)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((ingredients, total))
    }

    async fn get_ingredient(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let ingredient = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, name, energy_kcal, protein_g, fat_g, carb_g,
                   fiber_g, calcium_mg, sodium_mg, seasonality
            FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ingredient)
    }

    async fn list_recipes(
        &self,
        filter: RecipeFilter,
        page: PageParams,
    ) -> AppResult<(Vec<Recipe>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM recipes
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR cuisine ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(&filter.search)
        .bind(&filter.cuisine)
        .fetch_one(&self.pool)
        .await?;

        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, calories, macro_pro, macro_fat, macro_carb, cuisine
            FROM recipes
            WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
              AND ($2::TEXT IS NULL OR cuisine ILIKE '%' || $2 || '%')
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.search)
        .bind(&filter.cuisine)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((recipes, total))
    }

    async fn get_recipe(&self, id: i64) -> AppResult<Option<RecipeDetail>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, calories, macro_pro, macro_fat, macro_carb, cuisine
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(recipe) = recipe else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, IngredientLineRow>(
            r#"
            SELECT i.id, i.name, i.energy_kcal, i.protein_g, i.fat_g, i.carb_g,
                   i.fiber_g, i.calcium_mg, i.sodium_mg, i.seasonality,
                   ri.quantity
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RecipeDetail {
            recipe,
            ingredients: lines.into_iter().map(RecipeIngredient::from).collect(),
        }))
    }

    async fn insert_rating(
        &self,
        recipe_id: i64,
        stars: i16,
        comment: Option<String>,
    ) -> AppResult<bool> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Ok(false);
        }

        sqlx::query("INSERT INTO recipe_ratings (recipe_id, stars, comment) VALUES ($1, $2, $3)")
            .bind(recipe_id)
            .bind(stars)
            .bind(comment)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    async fn fetch_all_recipes(&self) -> AppResult<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            "SELECT id, name, calories, macro_pro, macro_fat, macro_carb, cuisine FROM recipes",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(recipes)
    }

    async fn fetch_rating_aggregate(&self) -> AppResult<HashMap<i64, f64>> {
        let rows = sqlx::query_as::<_, (i64, f64)>(
            r#"
            SELECT recipe_id, AVG(stars)::FLOAT8
            FROM recipe_ratings
            GROUP BY recipe_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
