// Fundwatch Application Layer

pub mod commands;
pub mod dtos;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod state;
pub mod validation;

pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
