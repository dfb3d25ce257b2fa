//! Core run inputs, independent of how they were parsed.
pub mod run;

pub use run::RunConfig;
