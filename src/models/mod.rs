use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub mod pagination;
pub mod profile;

pub use pagination::{total_pages, PageParams};
pub use profile::{MealPlan, MealRecipe, MealSlot, UserProfile, NO_MATCH_RECIPE_ID};

/// A recipe as stored in the catalog.
///
/// Macro values are total grams per serving. A recipe whose three macro
/// grams are all zero cannot be scored against a nutrition target and is
/// never selected while a scoreable alternative exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub macro_pro: f64,
    pub macro_fat: f64,
    pub macro_carb: f64,
    pub cuisine: Option<String>,
}

/// An ingredient with optional per-100g nutrition data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub energy_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carb_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub calcium_mg: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub seasonality: Option<String>,
}

/// One ingredient line of a recipe, with its quantity in grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub quantity: f64,
}

/// A recipe together with its full ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Request body for creating a recipe rating
#[derive(Debug, Clone, Deserialize)]
pub struct RatingCreate {
    /// Star value, 1-5
    pub stars: i16,
    /// Optional free-text comment, at most 300 characters
    pub comment: Option<String>,
}

/// Response body for a created rating
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub success: bool,
}
