//! Core domain models for a release run
//!
//! This module defines the release event, the trigger gate, the step and
//! state models, and the configuration they are built from.

pub mod config;
pub mod credentials;
pub mod event;
pub mod state;
pub mod step;
pub mod trigger;

pub use config::ReleaseConfig;
pub use credentials::{Credential, Credentials};
pub use event::ReleaseEvent;
pub use state::*;
pub use step::*;
pub use trigger::*;
