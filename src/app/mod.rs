//! Application module: CLI, pipeline orchestration and reporting

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod startup;
