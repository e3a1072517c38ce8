pub mod actor;
pub mod api;
pub mod blueprint;
pub mod config;
pub mod instrumentation;
pub mod sim;
