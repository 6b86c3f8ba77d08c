//! Relay Poller
//!
//! Triggers a remote Azure DevOps job and waits for it to finish.
//!
//! Architecture:
//! - Configuration: polling interval, optional deadline, retry budget
//! - Job kinds: the build and release flavours behind one `JobKind` trait
//! - Poller: the trigger → poll → classify state machine
//! - Artifacts: extraction of downloaded build artifacts
//!
//! The poller queries status on a fixed interval and waits between queries
//! with a cancellable timer, so a caller can stop it at any time through a
//! `CancellationToken`.

pub mod artifact;
pub mod config;
pub mod error;
pub mod kind;
pub mod poller;

pub use config::PollerConfig;
pub use error::{ConfigurationError, PollError};
pub use kind::{BuildJobs, JobKind, ReleaseJobs};
pub use poller::{Completion, RemoteJobPoller};
pub use tokio_util::sync::CancellationToken;
