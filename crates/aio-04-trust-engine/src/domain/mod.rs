//! Domain layer for trust scoring

pub mod components;
pub mod entities;
pub mod history;

pub use entities::*;
pub use history::ScoreHistory;
