use crate::models::Recipe;

/// Distance assigned to recipes whose macro grams are all zero. Large
/// enough that such a recipe is never selected while any scoreable
/// alternative survives the calorie filter.
pub const UNSCOREABLE_DISTANCE: f64 = 1e6;

/// Euclidean distance between a recipe's macro ratios and a target triple.
///
/// The recipe's own ratios are each macro's share of the summed macro
/// grams. Zero means a perfect macro match; lower is better. Pure and
/// deterministic.
pub fn macro_distance(
    recipe: &Recipe,
    target_pro: f64,
    target_fat: f64,
    target_carb: f64,
) -> f64 {
    let total = recipe.macro_pro + recipe.macro_fat + recipe.macro_carb;
    if total == 0.0 {
        return UNSCOREABLE_DISTANCE;
    }

    let pro_ratio = recipe.macro_pro / total;
    let fat_ratio = recipe.macro_fat / total;
    let carb_ratio = recipe.macro_carb / total;

    ((pro_ratio - target_pro).powi(2)
        + (fat_ratio - target_fat).powi(2)
        + (carb_ratio - target_carb).powi(2))
    .sqrt()
}
