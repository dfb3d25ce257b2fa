//! Configuration file loading and merging into CLI arguments.
mod apply;
mod loader;
pub mod types;


pub use apply::apply_config;
pub use loader::load_config;

pub(crate) use loader::default_config_exists;
#[cfg(test)]
pub(crate) use loader::load_config_file;
