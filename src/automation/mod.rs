//! # Work Item Lifecycle
//!
//! The stages a drawing goes through once it has been uploaded:
//!
//! 1. [`ResourceProvisioner`] makes sure the package and activity exist
//! 2. [`WorkItemSubmitter`] starts a job against the drawing
//! 3. [`StatusPoller`] checks on the job under a fixed request budget
//! 4. [`ResultUnpacker`] fans the job's result archive out into the blob store
//!
//! Each stage is invoked independently and keeps no state between calls.

pub mod provisioner;
pub mod result_unpacker;
pub mod status_poller;
pub mod submitter;

pub use provisioner::{ProvisionOutcome, ResourceProvisioner};
pub use result_unpacker::{normalize_entry_path, ResultUnpacker};
pub use status_poller::{PollOutcome, StatusPoller};
pub use submitter::WorkItemSubmitter;
