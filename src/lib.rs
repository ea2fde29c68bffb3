#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Viewer Automation
//!
//! Integration layer between a blob store and a remote drawing-automation API.
//! A client uploads a CAD drawing through a signed URL, asks for it to be
//! processed, polls for completion and finally has the job's result archive
//! unpacked into viewable assets.
//!
//! ## Work Item Lifecycle
//!
//! ```text
//! issue upload URL → (client uploads) → provision package/activity → submit
//!     → poll status (bounded) → unpack result archive → viewer + custom data URLs
//! ```
//!
//! Every stage is invoked independently and keeps no state between calls
//! beyond the configuration it was built with.
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration loading (defaults, TOML, environment)
//! - [`transport`] - Generic HTTP transport
//! - [`auth`] - Client-credential token exchange
//! - [`storage`] - Blob store abstraction and signed URLs
//! - [`api_clients`] - Remote workflow API client
//! - [`models`] - Package, activity and work item descriptors; output classification
//! - [`automation`] - Provisioner, submitter, status poller and result unpacker
//! - [`services`] - The four client-facing operations
//! - [`web`] - Axum HTTP front
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use viewer_automation::config::AutomationConfig;
//! use viewer_automation::services::ViewerAutomationService;
//! use viewer_automation::storage::MemoryBlobStore;
//! use viewer_automation::transport::ReqwestTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AutomationConfig::load(None)?;
//! let transport = Arc::new(ReqwestTransport::new(&config.http)?);
//! let store = Arc::new(MemoryBlobStore::new(config.storage.bucket.clone()));
//! let service = ViewerAutomationService::new(Arc::new(config), transport, store);
//!
//! let location = service.issue_upload_location(Some("plan.dwg")).await?;
//! println!("Upload the drawing to {}", location.url);
//! # Ok(())
//! # }
//! ```

pub mod api_clients;
pub mod auth;
pub mod automation;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod transport;
pub mod web;

pub use error::{AutomationError, AutomationResult, ErrorKind};
