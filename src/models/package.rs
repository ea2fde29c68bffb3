use serde::{Deserialize, Serialize};

use crate::constants::{odata, parameters};

/// App package descriptor, POSTed once per package name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppPackage {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub description: Option<String>,
    pub id: String,
    pub is_object_enabler: bool,
    pub is_public: bool,
    #[serde(rename = "References@odata.type")]
    pub references_odata_type: String,
    pub references: Vec<String>,
    pub required_engine_version: String,
    /// Upload target the bundle bytes were PUT to
    pub resource: String,
    pub timestamp: String,
    pub version: i64,
}

impl AppPackage {
    pub fn new(
        name: impl Into<String>,
        required_engine_version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            odata_type: odata::APP_PACKAGE.to_string(),
            description: None,
            id: name.into(),
            is_object_enabler: false,
            is_public: false,
            references_odata_type: odata::STRING_COLLECTION.to_string(),
            references: Vec::new(),
            required_engine_version: required_engine_version.into(),
            resource: resource.into(),
            timestamp: parameters::NEW_DESCRIPTOR_TIMESTAMP.to_string(),
            version: 0,
        }
    }
}
