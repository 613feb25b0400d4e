// Domain layer - Dashboard data and state transitions
pub mod fetch_state;
pub mod metrics;
pub mod sample;
