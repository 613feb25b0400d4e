// Presentation layer - HTTP surface and view model
pub mod app_state;
pub mod handlers;
pub mod view;
