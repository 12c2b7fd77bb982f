pub mod app;
pub mod config;
pub mod overlay;
pub mod session;
pub mod shared;
pub mod store;
pub mod tui;
