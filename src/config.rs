// src/config.rs
//
// Configuration comes from two layers: an optional YAML pipeline file and the
// command-line flags of the `harvest` binary, which override the file.

pub mod cli;
pub mod input;
pub mod pipeline;

pub use cli::Args;
pub use input::InputConfig;
pub use pipeline::{
    load_pipeline_config, FetchConfig, OcrConfig, OutputConfig, PipelineConfig, ReportFormat,
};
