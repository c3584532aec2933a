pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod processor;
pub mod report;
pub mod scanner;
