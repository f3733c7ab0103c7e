//! Core data models for the pairing engine.

mod competitor;
mod history;
mod ids;
mod pairing;
mod played;
mod result;

pub use competitor::*;
pub use history::*;
pub use ids::*;
pub use pairing::*;
pub use played::*;
pub use result::*;
