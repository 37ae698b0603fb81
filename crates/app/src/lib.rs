//! Shared application context for the Tripcart CLI.

pub mod context;
