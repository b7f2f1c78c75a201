// Domain entities

pub mod config;
pub mod event;
pub mod query;

pub use config::*;
pub use event::*;
pub use query::*;
