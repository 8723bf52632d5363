//! Execution runner -- pick the target, decide how to run it, run it once
//! under a wall-clock deadline.

pub mod dispatch;
pub mod execute;
pub mod target;

pub use dispatch::Dispatch;
pub use execute::ExecutionRunner;
pub use target::select_target;
