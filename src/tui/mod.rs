pub mod flows;
pub mod keys;
pub mod screens;

pub use flows::run_dimensions_tui;
