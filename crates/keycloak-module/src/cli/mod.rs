//! Command-line entry point of the get_token module

pub mod args;
pub mod handlers;

pub use args::Args;
