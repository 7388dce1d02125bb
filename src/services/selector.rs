use std::collections::HashMap;

use rand::Rng;

use crate::models::Recipe;
use crate::services::scorer;

/// Relative calorie deviation beyond which a candidate is discarded
pub const CALORIE_BAND: f64 = 0.5;

const TASTE_BONUS: f64 = 0.8;
const HIGH_RATING_BONUS: f64 = 0.8;
const GOOD_RATING_BONUS: f64 = 0.9;
const LOW_RATING_PENALTY: f64 = 1.1;

/// Picks the best-matching recipe for one meal slot, or `None` when no
/// candidate falls within the calorie band.
///
/// Scoring per candidate (lower is better): relative calorie deviation,
/// plus the macro-ratio distance, times the taste and rating factors,
/// times a fresh random factor in [0.9, 1.1]. The perturbation is re-drawn
/// on every invocation, so repeated calls with identical inputs may pick
/// different recipes; callers that need stable results go through the plan
/// cache instead of calling this directly.
pub fn pick_recipe<'a, R: Rng>(
    pool: &'a [Recipe],
    kcal_target: f64,
    target_pro: f64,
    target_fat: f64,
    target_carb: f64,
    taste_tags: &[String],
    ratings: &HashMap<i64, f64>,
    rng: &mut R,
) -> Option<&'a Recipe> {
    let mut candidates: Vec<(&Recipe, f64)> = Vec::new();

    for recipe in pool {
        let kcal_diff = (recipe.calories - kcal_target).abs() / kcal_target;
        if kcal_diff > CALORIE_BAND {
            continue;
        }

        let mut score = kcal_diff;
        score += scorer::macro_distance(recipe, target_pro, target_fat, target_carb);

        if matches_taste(recipe, taste_tags) {
            score *= TASTE_BONUS;
        }

        // Absent entries mean "no ratings yet": neutral, distinct from low-rated
        let avg_star = ratings.get(&recipe.id).copied().unwrap_or(0.0);
        if avg_star >= 4.0 {
            score *= HIGH_RATING_BONUS;
        } else if avg_star >= 3.5 {
            score *= GOOD_RATING_BONUS;
        } else if avg_star > 0.0 && avg_star < 2.5 {
            score *= LOW_RATING_PENALTY;
        }

        score *= rng.gen_range(0.9..=1.1);
        candidates.push((recipe, score));
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(recipe, _)| recipe)
}

/// Case-insensitive substring match of any taste tag against the cuisine label
fn matches_taste(recipe: &Recipe, taste_tags: &[String]) -> bool {
    let Some(cuisine) = recipe.cuisine.as_deref() else {
        return false;
    };
    if cuisine.is_empty() {
        return false;
    }
    let cuisine = cuisine.to_lowercase();
    taste_tags
        .iter()
        .any(|tag| cuisine.contains(&tag.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn recipe(id: i64, calories: f64, pro: f64, fat: f64, carb: f64) -> Recipe {
        Recipe {
            id,
            name: format!("recipe-{}", id),
            calories,
            macro_pro: pro,
            macro_fat: fat,
            macro_carb: carb,
            cuisine: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let picked = pick_recipe(
            &[],
            600.0,
            0.3,
            0.3,
            0.4,
            &[],
            &HashMap::new(),
            &mut rng(),
        );
        assert!(picked.is_none());
    }

    #[test]
    fn test_single_candidate_within_band_is_selected() {
        let pool = vec![recipe(1, 550.0, 30.0, 30.0, 40.0)];
        let picked = pick_recipe(
            &pool,
            600.0,
            0.3,
            0.3,
            0.4,
            &[],
            &HashMap::new(),
            &mut rng(),
        );
        assert_eq!(picked.map(|r| r.id), Some(1));
    }

    #[test]
    fn test_calorie_band_disqualifies_far_candidates() {
        // 200 kcal vs a 600 kcal target deviates by 66% and must never win,
        // even against nothing.
        let pool = vec![recipe(1, 200.0, 30.0, 30.0, 40.0)];
        let picked = pick_recipe(
            &pool,
            600.0,
            0.3,
            0.3,
            0.4,
            &[],
            &HashMap::new(),
            &mut rng(),
        );
        assert!(picked.is_none());
    }

    #[test]
    fn test_selected_recipe_is_always_within_band() {
        let pool = vec![
            recipe(1, 100.0, 30.0, 30.0, 40.0),
            recipe(2, 620.0, 30.0, 30.0, 40.0),
            recipe(3, 2000.0, 30.0, 30.0, 40.0),
        ];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_recipe(
                &pool,
                600.0,
                0.3,
                0.3,
                0.4,
                &[],
                &HashMap::new(),
                &mut rng,
            )
            .expect("in-band candidate exists");
            let deviation = (picked.calories - 600.0).abs() / 600.0;
            assert!(deviation <= CALORIE_BAND);
        }
    }

    // The perturbation ranges of a x0.8-rated candidate and an unrated one
    // with the same base score cannot overlap (0.8 * 1.1 < 0.9), so the
    // outcome is deterministic despite the random factor.
    #[test]
    fn test_high_rating_beats_unrated_twin() {
        let pool = vec![
            recipe(1, 550.0, 30.0, 30.0, 40.0),
            recipe(2, 550.0, 30.0, 30.0, 40.0),
        ];
        let ratings = HashMap::from([(2_i64, 4.5_f64)]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_recipe(&pool, 600.0, 0.3, 0.3, 0.4, &[], &ratings, &mut rng);
            assert_eq!(picked.map(|r| r.id), Some(2));
        }
    }

    #[test]
    fn test_low_rating_loses_to_high_rating() {
        // x1.1 band vs x0.8 band: disjoint even under perturbation
        let pool = vec![
            recipe(1, 550.0, 30.0, 30.0, 40.0),
            recipe(2, 550.0, 30.0, 30.0, 40.0),
        ];
        let ratings = HashMap::from([(1_i64, 2.0_f64), (2_i64, 4.0_f64)]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_recipe(&pool, 600.0, 0.3, 0.3, 0.4, &[], &ratings, &mut rng);
            assert_eq!(picked.map(|r| r.id), Some(2));
        }
    }

    #[test]
    fn test_taste_tag_matches_cuisine_case_insensitively() {
        let mut spicy = recipe(1, 550.0, 30.0, 30.0, 40.0);
        spicy.cuisine = Some("Sichuan Spicy".to_string());
        let plain = recipe(2, 550.0, 30.0, 30.0, 40.0);
        let pool = vec![plain, spicy];

        let tags = vec!["SPICY".to_string()];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_recipe(
                &pool,
                600.0,
                0.3,
                0.3,
                0.4,
                &tags,
                &HashMap::new(),
                &mut rng,
            );
            assert_eq!(picked.map(|r| r.id), Some(1));
        }
    }

    #[test]
    fn test_unscoreable_recipe_never_beats_scoreable_one() {
        let zero = recipe(1, 600.0, 0.0, 0.0, 0.0);
        let normal = recipe(2, 620.0, 10.0, 80.0, 10.0);
        let pool = vec![zero, normal];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_recipe(
                &pool,
                600.0,
                0.3,
                0.3,
                0.4,
                &[],
                &HashMap::new(),
                &mut rng,
            );
            assert_eq!(picked.map(|r| r.id), Some(2));
        }
    }
}
