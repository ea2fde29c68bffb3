//! # Extracted Output Set
//!
//! Classification of the files unpacked from a work item's result archive.
//! Every entry is uploaded; only the viewer payload and the custom-data file
//! are reported back.
//!
//! Selection is independent of upload completion order: `.svf` beats `.f2d`,
//! and among candidates of the same role the lexicographically smallest key
//! wins.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base name of the custom-data file, matched case-insensitively
pub const CUSTOM_DATA_FILE_NAME: &str = "xdata.json";

/// Viewer payload formats, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewerFormat {
    /// 3D viewable
    Svf,
    /// 2D viewable
    F2d,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputRole {
    Primary(ViewerFormat),
    CustomData,
    Unclassified,
}

/// Classify an entry by its (normalized) path
pub fn classify_entry(path: &str) -> OutputRole {
    let path = Path::new(path);

    let extension = path.extension().and_then(|ext| ext.to_str());
    if let Some(ext) = extension {
        if ext.eq_ignore_ascii_case("svf") {
            return OutputRole::Primary(ViewerFormat::Svf);
        }
        if ext.eq_ignore_ascii_case("f2d") {
            return OutputRole::Primary(ViewerFormat::F2d);
        }
    }

    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) if name.eq_ignore_ascii_case(CUSTOM_DATA_FILE_NAME) => OutputRole::CustomData,
        _ => OutputRole::Unclassified,
    }
}

/// Outcome of a fully unpacked result archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedOutputSet {
    /// Uploaded location of the viewer payload
    pub primary: Option<String>,
    /// Uploaded location of the custom-data file
    pub custom_data: Option<String>,
    /// Number of entries uploaded
    pub uploaded: usize,
}

#[derive(Debug, Clone)]
struct Candidate {
    key: String,
    location: String,
}

/// Accumulates uploaded entries into an [`ExtractedOutputSet`]
#[derive(Debug, Default)]
pub struct OutputSetBuilder {
    primary: Option<(ViewerFormat, Candidate)>,
    custom_data: Option<Candidate>,
    uploaded: usize,
}

impl OutputSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished upload
    pub fn record(&mut self, key: &str, location: &str) -> OutputRole {
        self.uploaded += 1;
        let role = classify_entry(key);
        let candidate = Candidate {
            key: key.to_string(),
            location: location.to_string(),
        };

        match role {
            OutputRole::Primary(format) => {
                let replace = match &self.primary {
                    None => true,
                    Some((current_format, current)) => {
                        (format, key) < (*current_format, current.key.as_str())
                    }
                };
                if replace {
                    self.primary = Some((format, candidate));
                }
            }
            OutputRole::CustomData => {
                let replace = self
                    .custom_data
                    .as_ref()
                    .map_or(true, |current| key < current.key.as_str());
                if replace {
                    self.custom_data = Some(candidate);
                }
            }
            OutputRole::Unclassified => {}
        }

        role
    }

    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    pub fn build(self) -> ExtractedOutputSet {
        ExtractedOutputSet {
            primary: self.primary.map(|(_, candidate)| candidate.location),
            custom_data: self.custom_data.map(|candidate| candidate.location),
            uploaded: self.uploaded,
        }
    }
}
