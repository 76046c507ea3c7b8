pub mod cards;
pub mod evaluation;

pub use cards::Deck;
pub use evaluation::{evaluate_best_hand, HandCategory, HandRank};
