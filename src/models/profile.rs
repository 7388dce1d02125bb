use serde::{Deserialize, Serialize};

use crate::models::Recipe;

/// Sentinel recipe identifier used when a slot has no suitable recipe
pub const NO_MATCH_RECIPE_ID: i64 = -1;

/// Label reported alongside the sentinel identifier
pub const NO_MATCH_LABEL: &str = "no suitable recipe found";

/// Nutrition target and taste preferences for one recommendation request
///
/// The three macro ratios are taken as the caller supplies them; they are
/// not required to sum to 1, the distance metric tolerates any values.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Daily calorie target in kcal, must be positive
    pub daily_calories: f64,
    #[serde(default = "default_macro_pro")]
    pub macro_pro: f64,
    #[serde(default = "default_macro_fat")]
    pub macro_fat: f64,
    #[serde(default = "default_macro_carb")]
    pub macro_carb: f64,
    /// Taste / cuisine preference tags, matched case-insensitively
    #[serde(default)]
    pub taste_tags: Vec<String>,
}

fn default_macro_pro() -> f64 {
    0.3
}

fn default_macro_fat() -> f64 {
    0.3
}

fn default_macro_carb() -> f64 {
    0.4
}

/// One of the three daily meal occasions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    /// Fixed share of the daily calorie target assigned to this slot.
    /// The three fractions sum to 1.0.
    pub fn fraction(self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.3,
            MealSlot::Lunch => 0.4,
            MealSlot::Dinner => 0.3,
        }
    }
}

/// The recipe chosen for one meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecipe {
    pub meal: MealSlot,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub calories: f64,
}

impl MealRecipe {
    /// Builds the slot result from the selector's outcome. A `None`
    /// selection is reported as sentinel data, not escalated to an error.
    pub fn from_selection(meal: MealSlot, picked: Option<&Recipe>) -> Self {
        match picked {
            Some(recipe) => Self {
                meal,
                recipe_id: recipe.id,
                recipe_name: recipe.name.clone(),
                calories: recipe.calories,
            },
            None => Self {
                meal,
                recipe_id: NO_MATCH_RECIPE_ID,
                recipe_name: NO_MATCH_LABEL.to_string(),
                calories: 0.0,
            },
        }
    }
}

/// The full three-meal recommendation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub breakfast: MealRecipe,
    pub lunch: MealRecipe,
    pub dinner: MealRecipe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_fractions_sum_to_one() {
        let sum: f64 = MealSlot::ALL.iter().map(|s| s.fraction()).sum();
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_meal_slot_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MealSlot::Breakfast).unwrap(),
            r#""breakfast""#
        );
    }

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"daily_calories": 2000}"#).unwrap();
        assert_eq!(profile.macro_pro, 0.3);
        assert_eq!(profile.macro_fat, 0.3);
        assert_eq!(profile.macro_carb, 0.4);
        assert!(profile.taste_tags.is_empty());
    }

    #[test]
    fn test_no_match_selection_carries_sentinel() {
        let meal = MealRecipe::from_selection(MealSlot::Lunch, None);
        assert_eq!(meal.recipe_id, NO_MATCH_RECIPE_ID);
        assert_eq!(meal.recipe_name, NO_MATCH_LABEL);
        assert_eq!(meal.calories, 0.0);
    }
}
