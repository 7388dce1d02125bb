use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::models::{MealPlan, UserProfile};

/// Normalized cache key for one recommendation request.
///
/// Macro ratios are rounded to 2 decimals and taste tags are lowercased,
/// sorted and deduplicated, so requests that differ only in tag order,
/// tag casing or the 3rd decimal of a ratio share an entry. The calorie
/// target is taken as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    calories_bits: u64,
    pro_pct: i64,
    fat_pct: i64,
    carb_pct: i64,
    tags: Vec<String>,
}

impl PlanKey {
    pub fn new(profile: &UserProfile) -> Self {
        let mut tags: Vec<String> = profile
            .taste_tags
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        tags.sort();
        tags.dedup();

        Self {
            calories_bits: profile.daily_calories.to_bits(),
            pro_pct: round_pct(profile.macro_pro),
            fat_pct: round_pct(profile.macro_fat),
            carb_pct: round_pct(profile.macro_carb),
            tags,
        }
    }
}

fn round_pct(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

struct CachedPlan {
    created_at: Instant,
    plan: MealPlan,
}

/// Bounded memo of assembled meal plans.
///
/// Entries expire logically after the TTL and are overwritten in place on
/// the next miss; there is no proactive sweep. Size is capped with LRU
/// eviction. Callers pass `now` explicitly, the cache itself never reads
/// the clock.
pub struct PlanCache {
    entries: LruCache<PlanKey, CachedPlan>,
    ttl: Duration,
}

impl PlanCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Returns the stored plan when a fresh entry exists. Stale entries are
    /// left in place for the subsequent insert to overwrite.
    pub fn get(&mut self, key: &PlanKey, now: Instant) -> Option<MealPlan> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.created_at) < self.ttl {
            Some(entry.plan.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: PlanKey, plan: MealPlan, now: Instant) {
        self.entries.put(
            key,
            CachedPlan {
                created_at: now,
                plan,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealRecipe, MealSlot};

    fn profile(calories: f64, pro: f64, tags: &[&str]) -> UserProfile {
        UserProfile {
            daily_calories: calories,
            macro_pro: pro,
            macro_fat: 0.3,
            macro_carb: 0.4,
            taste_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn plan(id: i64) -> MealPlan {
        let meal = |slot| MealRecipe {
            meal: slot,
            recipe_id: id,
            recipe_name: format!("recipe-{}", id),
            calories: 500.0,
        };
        MealPlan {
            breakfast: meal(MealSlot::Breakfast),
            lunch: meal(MealSlot::Lunch),
            dinner: meal(MealSlot::Dinner),
        }
    }

    #[test]
    fn test_key_ignores_third_decimal_and_tag_shape() {
        let a = PlanKey::new(&profile(2000.0, 0.301, &["Spicy", "spicy"]));
        let b = PlanKey::new(&profile(2000.0, 0.3006, &["spicy"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_ignores_tag_order() {
        let a = PlanKey::new(&profile(2000.0, 0.3, &["sweet", "spicy"]));
        let b = PlanKey::new(&profile(2000.0, 0.3, &["Spicy", "Sweet"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_distinguishes_second_decimal() {
        let a = PlanKey::new(&profile(2000.0, 0.30, &[]));
        let b = PlanKey::new(&profile(2000.0, 0.32, &[]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_distinguishes_calorie_target() {
        let a = PlanKey::new(&profile(2000.0, 0.3, &[]));
        let b = PlanKey::new(&profile(1800.0, 0.3, &[]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fresh_entry_is_returned() {
        let mut cache = PlanCache::new(8, Duration::from_secs(1800));
        let key = PlanKey::new(&profile(2000.0, 0.3, &[]));
        let now = Instant::now();

        cache.insert(key.clone(), plan(1), now);
        assert_eq!(cache.get(&key, now), Some(plan(1)));
        assert_eq!(
            cache.get(&key, now + Duration::from_secs(1799)),
            Some(plan(1))
        );
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let mut cache = PlanCache::new(8, Duration::from_secs(1800));
        let key = PlanKey::new(&profile(2000.0, 0.3, &[]));
        let now = Instant::now();

        cache.insert(key.clone(), plan(1), now);
        assert_eq!(cache.get(&key, now + Duration::from_secs(1800)), None);
        assert_eq!(cache.get(&key, now + Duration::from_secs(5000)), None);
    }

    #[test]
    fn test_insert_overwrites_stale_entry() {
        let mut cache = PlanCache::new(8, Duration::from_secs(1800));
        let key = PlanKey::new(&profile(2000.0, 0.3, &[]));
        let now = Instant::now();

        cache.insert(key.clone(), plan(1), now);
        let later = now + Duration::from_secs(3600);
        cache.insert(key.clone(), plan(2), later);
        assert_eq!(cache.get(&key, later), Some(plan(2)));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut cache = PlanCache::new(2, Duration::from_secs(1800));
        let now = Instant::now();
        let k1 = PlanKey::new(&profile(1000.0, 0.3, &[]));
        let k2 = PlanKey::new(&profile(2000.0, 0.3, &[]));
        let k3 = PlanKey::new(&profile(3000.0, 0.3, &[]));

        cache.insert(k1.clone(), plan(1), now);
        cache.insert(k2.clone(), plan(2), now);
        cache.insert(k3.clone(), plan(3), now);

        assert_eq!(cache.get(&k1, now), None);
        assert_eq!(cache.get(&k2, now), Some(plan(2)));
        assert_eq!(cache.get(&k3, now), Some(plan(3)));
    }
}
