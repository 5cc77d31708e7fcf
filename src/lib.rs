#![allow(non_snake_case)]

// Modules that make up the harvesting pipeline. The `harvest` binary drives
// them through `harvest_logic::run_harvest`.
pub mod config;
pub mod data_model;
pub mod error;
pub mod executor;
pub mod harvest_logic;
pub mod pipeline;
pub mod utils;

pub use data_model::{BidRecord, ProcessingResult};
pub use error::{PipelineError, Result};
