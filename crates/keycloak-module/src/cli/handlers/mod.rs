//! Command handlers for the get_token module

pub mod token;
