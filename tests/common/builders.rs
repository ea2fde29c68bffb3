use serde_json::json;
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use viewer_automation::api_clients::DesignAutomationClient;
use viewer_automation::auth::AccessToken;
use viewer_automation::config::{ApiConfig, AutomationConfig, PollerConfig};
use viewer_automation::transport::HttpMethod;

use super::mock_transport::ScriptedTransport;

pub const API_BASE: &str = "https://da.example.com/v2";
pub const AUTH_URL: &str = "https://auth.example.com/authenticate";
pub const BUNDLE_URL: &str = "https://packages.example.com/bundle.zip";
pub const BUCKET: &str = "viewer-bucket";
pub const TOKEN_HEADER: &str = "Bearer test-token";

pub fn package_endpoint() -> String {
    format!("{API_BASE}/AppPackages")
}

pub fn package_upload_endpoint() -> String {
    format!("{API_BASE}/AppPackages/Operations.GetUploadUrl()")
}

pub fn activity_endpoint() -> String {
    format!("{API_BASE}/Activities")
}

pub fn workitem_endpoint() -> String {
    format!("{API_BASE}/WorkItems")
}

pub fn point(collection: &str, id: &str) -> String {
    format!("{collection}('{id}')")
}

pub fn test_api_config() -> ApiConfig {
    ApiConfig {
        auth_endpoint: AUTH_URL.to_string(),
        package_endpoint: package_endpoint(),
        package_upload_endpoint: package_upload_endpoint(),
        activity_endpoint: activity_endpoint(),
        workitem_endpoint: workitem_endpoint(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        ..ApiConfig::default()
    }
}

/// Default configuration pointed at the scripted endpoints, with no poll delay
pub fn test_config() -> AutomationConfig {
    let mut config = AutomationConfig::default();
    config.api = test_api_config();
    config.package.source_url = BUNDLE_URL.to_string();
    config.storage.bucket = BUCKET.to_string();
    config.poller = PollerConfig {
        interval_ms: 0,
        max_polls: 11,
    };
    config
}

pub fn test_client(transport: Arc<ScriptedTransport>) -> DesignAutomationClient {
    DesignAutomationClient::new(
        transport,
        test_api_config(),
        AccessToken::new("Bearer", "test-token"),
    )
}

pub fn script_token(transport: &ScriptedTransport) {
    transport.respond_json(
        HttpMethod::Post,
        AUTH_URL,
        200,
        json!({"token_type": "Bearer", "access_token": "test-token", "expires_in": 1799}),
    );
}

/// Package and every default activity already exist remotely
pub fn script_provisioned(transport: &ScriptedTransport, config: &AutomationConfig) {
    transport.respond(
        HttpMethod::Get,
        &point(&package_endpoint(), &config.package.name),
        200,
        "{}",
    );
    for activity in &config.activities {
        transport.respond(
            HttpMethod::Get,
            &point(&activity_endpoint(), &activity.name),
            200,
            "{}",
        );
    }
}

pub fn work_item_record(status: &str) -> serde_json::Value {
    json!({
        "@odata.type": "#ACES.Models.WorkItem",
        "Id": "wi-1",
        "ActivityId": "MyPublishActivity3d",
        "Status": status,
        "Arguments": {
            "InputArguments": [],
            "OutputArguments": [{"Name": "Results", "Resource": "https://x/out.zip"}]
        },
        "StatusDetails": {"Report": "https://x/report.txt"}
    })
}

/// Zip archive with the given file entries
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    zip_archive_with_dirs(&[], entries)
}

/// Zip archive with directory entries followed by file entries
pub fn zip_archive_with_dirs(dirs: &[&str], entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for dir in dirs {
        writer.add_directory(*dir, options).unwrap();
    }
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Stored zip archive as streaming writers produce it: general-purpose flag
/// bit 3 set, zeroed CRC and sizes in every local header, and the real values
/// in a data descriptor after each entry's data.
pub fn zip_archive_with_data_descriptors(entries: &[(&str, &[u8])]) -> Vec<u8> {
    const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, data) in entries {
        let offset = out.len() as u32;
        let crc = crc32(data);
        let size = data.len() as u32;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&FLAG_DATA_DESCRIPTOR.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // stored
        out.extend_from_slice(&[0; 4]); // mod time and date
        out.extend_from_slice(&[0; 12]); // crc and sizes deferred
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        out.extend_from_slice(&0x0807_4b50u32.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&FLAG_DATA_DESCRIPTOR.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&[0; 4]);
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&size.to_le_bytes());
        central.extend_from_slice(&size.to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&[0; 8]); // extra, comment, disk, internal attrs
        central.extend_from_slice(&[0; 4]); // external attrs
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let central_offset = out.len() as u32;
    let count = entries.len() as u16;
    out.extend_from_slice(&central);
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]); // disk numbers
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for byte in data {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}
