//! # System Constants
//!
//! Fixed names, markers and defaults that define the wire contract with the
//! remote workflow API and the blob store key layout.

/// Blob store key layout and signed URL markers
pub mod markers {
    /// Signed URLs carry the object key right after this marker
    pub const BUCKET_DOMAIN_MARKER: &str = "amazonaws.com/";
    /// Folder every uploaded drawing lands under
    pub const DRAWING_FOLDER: &str = "drawings/";
    /// Folder every unpacked work item result lands under
    pub const RESULT_FOLDER: &str = "files/";
}

/// Constant `Result` value carried by every failure body
pub const ERROR_RESULT_MARKER: &str = "Error message";

/// Default configuration values
pub mod defaults {
    use crate::config::ActivityDefinition;

    pub const AUTH_ENDPOINT: &str =
        "https://developer.api.autodesk.com/authentication/v1/authenticate";
    pub const PACKAGE_ENDPOINT: &str =
        "https://developer.api.autodesk.com/autocad.io/us-east/v2/AppPackages";
    pub const PACKAGE_UPLOAD_ENDPOINT: &str =
        "https://developer.api.autodesk.com/autocad.io/us-east/v2/AppPackages/Operations.GetUploadUrl()";
    pub const ACTIVITY_ENDPOINT: &str =
        "https://developer.api.autodesk.com/autocad.io/us-east/v2/Activities";
    pub const WORKITEM_ENDPOINT: &str =
        "https://developer.api.autodesk.com/autocad.io/us-east/v2/WorkItems";
    pub const TOKEN_SCOPE: &str = "code:all";

    pub const PACKAGE_NAME: &str = "MyCustomPackage";
    pub const REFERENCE_PACKAGE_NAME: &str = "Publish2View21";
    pub const REQUIRED_ENGINE_VERSION: &str = "21.0";

    pub const DRAWING_NAME: &str = "input.dwg";
    pub const SIGNED_URL_TTL_SECONDS: u64 = 900;
    pub const MAX_CONCURRENT_UPLOADS: usize = 16;

    pub const POLL_INTERVAL_MS: u64 = 2_000;
    pub const MAX_POLLS: u32 = 11;

    pub const BIND_ADDRESS: &str = "0.0.0.0:8080";
    /// Mirrors the gateway deadline in front of the status endpoint
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

    pub const PUBLISH_3D_ACTIVITY: &str = "MyPublishActivity3d";
    pub const PUBLISH_3D_SCRIPT: &str = "_test ./result/xdata.json\r\n_prepareforpropertyextraction index.json\r\n_indexextractor index.json\r\n_publishtosvf ./output/result.svf\r\n_createbubblepackage ./output ./result \r\n\n";

    pub const PUBLISH_2D_ACTIVITY: &str = "MyPublishActivity2d";
    pub const PUBLISH_2D_SCRIPT: &str = "_test ./result/xdata.json\r\n_prepareforpropertyextraction index.json\r\n_indexextractor index.json\r\n_publishtof2d ./output\r\n_createbubblepackage ./output ./result \r\n\n";

    /// The two publish activities shipped by default
    pub fn activities() -> Vec<ActivityDefinition> {
        vec![
            ActivityDefinition::new(PUBLISH_3D_ACTIVITY, PUBLISH_3D_SCRIPT),
            ActivityDefinition::new(PUBLISH_2D_ACTIVITY, PUBLISH_2D_SCRIPT),
        ]
    }
}

/// Names used inside activity and work item descriptors
pub mod parameters {
    pub const HOST_DRAWING: &str = "HostDwg";
    pub const HOST_DRAWING_LOCAL_FILE: &str = "$(HostDwg)";
    pub const PARAMS: &str = "Params";
    pub const PARAMS_LOCAL_FILE: &str = "params.json";
    pub const RESULTS: &str = "Results";
    pub const RESULTS_LOCAL_FILE: &str = "result";

    /// Empty embedded JSON literal passed as the parameters file
    pub const EMPTY_PARAMS_RESOURCE: &str = "data:application/json, ";
    pub const STORAGE_PROVIDER_GENERIC: &str = "Generic";
    pub const RESOURCE_KIND_EMBEDDED: &str = "Embedded";
    pub const RESOURCE_KIND_ZIP_PACKAGE: &str = "ZipPackage";
    pub const HTTP_VERB_POST: &str = "POST";

    /// Placeholder timestamp the remote API expects on new descriptors
    pub const NEW_DESCRIPTOR_TIMESTAMP: &str = "0001-01-01T00:00:00Z";
}

/// OData type annotations understood by the remote API
pub mod odata {
    pub const APP_PACKAGE: &str = "#ACES.Models.AppPackage";
    pub const ACTIVITY: &str = "#ACES.Models.Activity";
    pub const INSTRUCTION: &str = "#ACES.Models.Instruction";
    pub const PARAMETERS: &str = "#ACES.Models.Parameters";
    pub const PARAMETER: &str = "#ACES.Models.Parameter";
    pub const PARAMETER_COLLECTION: &str = "#Collection(ACES.Models.Parameter)";
    pub const ALLOWED_CHILD_PROCESS_COLLECTION: &str =
        "#Collection(ACES.Models.AllowedChildProcess)";
    pub const STRING_COLLECTION: &str = "#Collection(String)";
    pub const WORK_ITEM: &str = "#ACES.Models.WorkItem";
    pub const ARGUMENTS: &str = "#ACES.Models.Arguments";
    pub const ARGUMENT: &str = "#ACES.Models.Argument";
    pub const ARGUMENT_COLLECTION: &str = "#Collection(ACES.Models.Argument)";
    pub const HEADER_COLLECTION: &str = "#Collection(ACES.Models.Header)";
    pub const HTTP_VERB_TYPE: &str = "#ACES.Models.HttpVerbType";
    pub const RESOURCE_KIND: &str = "#ACES.Models.ResourceKind";
    pub const STORAGE_PROVIDER: &str = "#ACES.Models.StorageProvider";
    pub const EXECUTION_STATUS: &str = "#ACES.Models.ExecutionStatus";
    pub const DATA_AFFINITY: &str = "#ACES.Models.DataAffinity";
}

/// Environment variables recognized by the configuration loader
pub mod env_vars {
    pub const DEVELOPER_KEY: &str = "ADSK_DEVELOPER_KEY";
    pub const DEVELOPER_SECRET: &str = "ADSK_DEVELOPER_SECRET";
    pub const BUCKET: &str = "DA_VIEWER_DWG_BUCKET";
    pub const BLOB_STORE: &str = "VIEWER_AUTOMATION_BLOB_STORE";
    pub const PACKAGE_SOURCE_URL: &str = "DA_PACKAGE_SOURCE_URL";
    pub const REQUIRED_ENGINE_VERSION: &str = "DA_REQUIRED_ENGINE_VERSION";
    pub const BIND_ADDRESS: &str = "VIEWER_AUTOMATION_BIND";
    pub const POLL_INTERVAL_MS: &str = "VIEWER_AUTOMATION_POLL_INTERVAL_MS";
    pub const MAX_POLLS: &str = "VIEWER_AUTOMATION_MAX_POLLS";
    pub const ENVIRONMENT: &str = "VIEWER_AUTOMATION_ENV";
    pub const LOG_FORMAT: &str = "VIEWER_AUTOMATION_LOG_FORMAT";
}
