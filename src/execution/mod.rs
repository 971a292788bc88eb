//! Release execution

pub mod error;
pub mod executor;
pub mod runner;

pub use error::{CommandError, ReleaseError};
pub use executor::{CommandExecutor, DryRunExecutor, SubprocessExecutor};
pub use runner::{EventHandler, ReleaseRunner, RunEvent, RunReport};
