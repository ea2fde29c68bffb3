//! Activity descriptor: a job template binding packages to a script and
//! parameter slots.

use serde::{Deserialize, Serialize};

use crate::constants::{odata, parameters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Activity {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "AllowedChildProcesses@odata.type")]
    pub allowed_child_processes_odata_type: String,
    pub allowed_child_processes: Vec<serde_json::Value>,
    #[serde(rename = "AppPackages@odata.type")]
    pub app_packages_odata_type: String,
    pub app_packages: Vec<String>,
    pub description: Option<String>,
    pub host_application: Option<String>,
    pub id: String,
    pub instruction: Instruction,
    pub is_public: bool,
    pub parameters: Parameters,
    pub required_engine_version: String,
    pub timestamp: String,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instruction {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub command_line_parameters: Option<String>,
    /// Newline-separated commands, sent verbatim
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameters {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "InputParameters@odata.type")]
    pub input_parameters_odata_type: String,
    pub input_parameters: Vec<Parameter>,
    #[serde(rename = "OutputParameters@odata.type")]
    pub output_parameters_odata_type: String,
    pub output_parameters: Vec<Parameter>,
}

/// Logical parameter name mapped to a local file name at execution time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub local_file_name: String,
    pub name: String,
    pub optional: Option<bool>,
}

impl Parameter {
    pub fn new(name: &str, local_file_name: &str) -> Self {
        Self {
            odata_type: odata::PARAMETER.to_string(),
            local_file_name: local_file_name.to_string(),
            name: name.to_string(),
            optional: None,
        }
    }
}

impl Activity {
    /// Build an activity with the host drawing and params inputs and the
    /// result bundle output
    pub fn new(
        name: impl Into<String>,
        package_names: Vec<String>,
        script: impl Into<String>,
        required_engine_version: impl Into<String>,
    ) -> Self {
        Self {
            odata_type: odata::ACTIVITY.to_string(),
            allowed_child_processes_odata_type: odata::ALLOWED_CHILD_PROCESS_COLLECTION
                .to_string(),
            allowed_child_processes: Vec::new(),
            app_packages_odata_type: odata::STRING_COLLECTION.to_string(),
            app_packages: package_names,
            description: None,
            host_application: None,
            id: name.into(),
            instruction: Instruction {
                odata_type: odata::INSTRUCTION.to_string(),
                command_line_parameters: None,
                script: script.into(),
            },
            is_public: false,
            parameters: Parameters {
                odata_type: odata::PARAMETERS.to_string(),
                input_parameters_odata_type: odata::PARAMETER_COLLECTION.to_string(),
                input_parameters: vec![
                    Parameter::new(parameters::HOST_DRAWING, parameters::HOST_DRAWING_LOCAL_FILE),
                    Parameter::new(parameters::PARAMS, parameters::PARAMS_LOCAL_FILE),
                ],
                output_parameters_odata_type: odata::PARAMETER_COLLECTION.to_string(),
                output_parameters: vec![Parameter::new(
                    parameters::RESULTS,
                    parameters::RESULTS_LOCAL_FILE,
                )],
            },
            required_engine_version: required_engine_version.into(),
            timestamp: parameters::NEW_DESCRIPTOR_TIMESTAMP.to_string(),
            version: 0,
        }
    }
}
