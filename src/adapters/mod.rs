//! Translation from user-facing inputs into core types.
pub mod cli;
