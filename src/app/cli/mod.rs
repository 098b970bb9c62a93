//! CLI module: argument parsing, config file merging and validation

pub mod api;
pub mod args;
pub mod config;
pub mod validation;

#[cfg(test)]
mod tests;
