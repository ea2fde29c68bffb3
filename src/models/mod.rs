//! # Remote Workflow Models
//!
//! Descriptors exchanged with the remote workflow API (packages, activities,
//! work items) and the classification of a work item's extracted outputs.

pub mod activity;
pub mod output_set;
pub mod package;
pub mod work_item;

pub use activity::{Activity, Instruction, Parameter, Parameters};
pub use output_set::{
    classify_entry, ExtractedOutputSet, OutputRole, OutputSetBuilder, ViewerFormat,
};
pub use package::AppPackage;
pub use work_item::{
    Argument, Arguments, RecordArgument, RecordArguments, StatusDetails, SubmittedWorkItem,
    WorkItem, WorkItemRecord, WorkItemStatus,
};
