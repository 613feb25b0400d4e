// Application layer - Refresh use cases
pub mod dashboard_repository;
pub mod dashboard_service;
pub mod refresh_scheduler;

#[cfg(test)]
pub mod test_support;
