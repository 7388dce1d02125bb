pub mod explain;
pub mod plan_cache;
pub mod recommender;
pub mod scorer;
pub mod selector;

pub use explain::Explainer;
pub use recommender::Recommender;
