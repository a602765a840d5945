pub mod cli;
pub mod client;
pub mod config;
pub mod fixtures;
pub mod harness;
pub mod report;
pub mod util;
