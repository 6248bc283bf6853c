//! Task runner: drives one target through fetch, open, save and close.

mod runner;
mod types;

pub use runner::{run_target, run_with_fetcher, DEFAULT_FILE_MODE};
pub use types::{TaskError, TaskOptions, TaskReport};
