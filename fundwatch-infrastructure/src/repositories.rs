pub mod clickhouse_store;
pub mod memory_store;
pub mod timeout_store;

pub use clickhouse_store::*;
pub use memory_store::*;
pub use timeout_store::*;
