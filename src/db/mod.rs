pub mod postgres;
pub mod store;

pub use postgres::create_pool;
pub use store::{IngredientFilter, PgRecipeStore, RecipeFilter, RecipeStore};

#[cfg(test)]
pub use store::MockRecipeStore;
