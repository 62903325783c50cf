//! # Collabgate Core
//!
//! Issue-driven collaborator access for a fixed GitHub repository.
//!
//! An issue titled with an `@mention` is classified into exactly one plan:
//! - **grant**: the user is not a collaborator; add them, comment, label, close
//! - **duplicate**: the user already is one; comment, label, close
//! - **self-request**: the mention is the repository owner; do nothing
//! - **probe-failure**: membership could not be determined; report failure
//!
//! Stages: [`mention`] → [`probe`] → [`resolver`] → [`executor`], wired by
//! [`pipeline::AccessPipeline`]. Only the probe and executor talk to GitHub,
//! through the [`traits::CollaboratorApi`] seam.
//!
//! ## Example
//!
//! ```no_run
//! use collabgate_core::{AccessConfig, AccessPipeline, GitHubApiClient, TriggerEvent};
//!
//! # async fn example() -> collabgate_core::Result<()> {
//! let config = AccessConfig::default();
//! let client = GitHubApiClient::from_env()?;
//! let event = TriggerEvent::new("Please add @alice-dev", 42);
//!
//! let outcome = AccessPipeline::new(&client, &config).run(&event).await?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod http;
pub mod mention;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod resolver;
pub mod traits;
pub mod types;

pub use config::AccessConfig;
pub use error::{Error, ErrorKind, Result};
pub use executor::ActionExecutor;
pub use http::{Credentials, GitHubApiClient};
pub use mention::extract_mention;
pub use pipeline::AccessPipeline;
pub use resolver::resolve;
pub use types::{
    ActionPlan, ActionStep, CollaboratorCheck, ExecutionPolicy, ExecutionReport, Permission,
    ProbeResult, RunOutcome, StepOutcome, StepResult, TargetRepository, TriggerEvent,
};
