pub mod alert;
pub mod analytics;
pub mod chart;
pub mod coin;
pub mod holding;
pub mod settings;
