//! API Client Modules
//!
//! Clients for the remote workflow API: package, activity and work item
//! endpoints, all authenticated with a per-invocation access token.

pub mod design_automation_client;

pub use design_automation_client::DesignAutomationClient;
