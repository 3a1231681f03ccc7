pub mod normalize;
pub mod policy;
pub mod token_scorer;

pub use policy::ScoringPolicy;
pub use token_scorer::score_all;
