pub mod app;
pub mod config;
pub mod model;
pub mod session;
pub mod user_config;
