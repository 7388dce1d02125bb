use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::db::RecipeStore;
use crate::error::{AppError, AppResult};
use crate::models::{MealPlan, MealRecipe, MealSlot, UserProfile};
use crate::services::plan_cache::{PlanCache, PlanKey};
use crate::services::selector;

/// The meal plan assembler.
///
/// Owns the plan cache and the perturbation RNG; one instance per process,
/// shared across request handlers. The single lock serializes the miss
/// path, so two concurrent identical requests compute once.
pub struct Recommender {
    state: Mutex<RecommenderState>,
}

struct RecommenderState {
    cache: PlanCache,
    rng: StdRng,
}

impl Recommender {
    pub fn new(cache_capacity: usize, cache_ttl: Duration) -> Self {
        Self::with_rng(cache_capacity, cache_ttl, StdRng::from_entropy())
    }

    /// Constructor with an explicit RNG, used by tests to fix the seed
    pub fn with_rng(cache_capacity: usize, cache_ttl: Duration, rng: StdRng) -> Self {
        Self {
            state: Mutex::new(RecommenderState {
                cache: PlanCache::new(cache_capacity, cache_ttl),
                rng,
            }),
        }
    }

    /// Assembles a three-meal plan for the profile, serving repeated
    /// requests from the cache within the TTL window.
    ///
    /// On a miss the recipe pool and rating aggregate are read once, as a
    /// single logical snapshot, then each slot selects independently; the
    /// same recipe may be chosen for two slots. An empty pool fails with
    /// `EmptyCatalog` before any slot is attempted, while a slot without an
    /// in-band candidate yields sentinel data in an otherwise successful
    /// plan.
    pub async fn recommend(
        &self,
        store: &dyn RecipeStore,
        profile: &UserProfile,
    ) -> AppResult<MealPlan> {
        if profile.daily_calories.is_nan() || profile.daily_calories <= 0.0 {
            return Err(AppError::InvalidInput(
                "daily_calories must be positive".to_string(),
            ));
        }

        let key = PlanKey::new(profile);
        let mut state = self.state.lock().await;

        if let Some(plan) = state.cache.get(&key, Instant::now()) {
            tracing::debug!("Plan cache hit");
            return Ok(plan);
        }

        let recipes = store.fetch_all_recipes().await?;
        if recipes.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        let ratings = store.fetch_rating_aggregate().await?;

        tracing::info!(
            recipe_count = recipes.len(),
            rated_count = ratings.len(),
            daily_calories = profile.daily_calories,
            "Assembling meal plan"
        );

        let RecommenderState { cache, rng } = &mut *state;
        let [breakfast, lunch, dinner] = MealSlot::ALL.map(|slot| {
            let kcal_target = profile.daily_calories * slot.fraction();
            let picked = selector::pick_recipe(
                &recipes,
                kcal_target,
                profile.macro_pro,
                profile.macro_fat,
                profile.macro_carb,
                &profile.taste_tags,
                &ratings,
                rng,
            );
            MealRecipe::from_selection(slot, picked)
        });

        let plan = MealPlan {
            breakfast,
            lunch,
            dinner,
        };
        cache.insert(key, plan.clone(), Instant::now());

        Ok(plan)
    }
}
