// Utils

pub mod logging;
pub mod progress;
pub mod prometheus_metrics;
pub mod text;

pub use text::sanitize_cell;
