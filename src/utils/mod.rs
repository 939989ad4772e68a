//! Utility modules for common functionality
//!
//! Logging, progress reporting and argument parsing used by the CLI.

pub mod logger;
pub mod progress;
pub mod parse_utils;
#[cfg(test)]
mod tests;
