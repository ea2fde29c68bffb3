//! # Web API Application State
//!
//! Shared state handed to every handler.

use std::sync::Arc;

use crate::services::ViewerAutomationService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<ViewerAutomationService>,
}

impl AppState {
    pub fn new(service: Arc<ViewerAutomationService>) -> Self {
        Self { service }
    }
}
