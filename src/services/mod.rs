pub mod viewer_automation;

pub use viewer_automation::ViewerAutomationService;
