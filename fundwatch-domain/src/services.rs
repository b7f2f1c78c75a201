// Domain services: fraud rules and the engine that runs them

pub mod engine;
pub mod rules;

pub use engine::*;
pub use rules::*;
