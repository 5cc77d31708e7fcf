// src/pipeline/mod.rs
//
// Stages of one reference's journey: fetch, extract text, extract fields.
// Readers and writers sit at either end of a run.

pub mod extractors;
pub mod fetcher;
pub mod fields;
pub mod readers;
pub mod writers;
