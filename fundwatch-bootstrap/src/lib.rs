pub mod context;
pub mod lifecycle;
pub mod readiness;
pub mod telemetry;

pub use lifecycle::{build_router_with_layers, run_standalone};

pub async fn run() -> anyhow::Result<()> {
    run_standalone().await
}
