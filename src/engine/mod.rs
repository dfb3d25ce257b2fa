//! Load-generation core: work claiming, worker scheduling, and run control.
mod completion;
mod controller;
mod distributor;
mod queue;


pub use controller::{RunController, run_and_render};
pub use distributor::{Distribution, WorkDistributor};
pub use queue::WorkQueue;
