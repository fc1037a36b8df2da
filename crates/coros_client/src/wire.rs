//! Request and response shapes of the vendor's web API.
//!
//! The API is undocumented; everything here was observed from the vendor's
//! own web app and may change without notice.

use crate::{ActivitySummary, ExportFormat, SportType, utils};
use serde::{Deserialize, Deserializer, Serialize};

pub const LOGIN_PATH: &str = "/account/login";
pub const ACTIVITY_QUERY_PATH: &str = "/activity/query";
pub const ACTIVITY_DOWNLOAD_PATH: &str = "/activity/detail/download";

/// Header carrying the session token on authenticated calls.
pub const ACCESS_TOKEN_HEADER: &str = "accessToken";

/// `accountType` value for email logins.
pub const EMAIL_ACCOUNT_TYPE: u8 = 2;

pub const RESULT_OK: &str = "0000";

/// Result codes returned when the access token is missing, expired, or was
/// invalidated by a login elsewhere.
pub const TOKEN_REJECTED: &[&str] = &["1019", "1030"];

/// `fileType` query value of each export format.
pub fn file_type_code(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "0",
        ExportFormat::Gpx => "1",
        ExportFormat::Kml => "2",
        ExportFormat::Tcx => "3",
        ExportFormat::Fit => "4",
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub account: &'a str,
    #[serde(rename = "accountType")]
    pub account_type: u8,
    /// Lowercase hex MD5 of the password.
    pub pwd: String,
}

/// Common response wrapper. HTTP status is 200 even for most failures; the
/// outcome is in `result`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        self.result.as_deref().is_none_or(|r| r == RESULT_OK)
    }

    pub fn is_token_rejected(&self) -> bool {
        self.result
            .as_deref()
            .is_some_and(|r| TOKEN_REJECTED.contains(&r))
    }

    /// The vendor message, or a placeholder naming the result code.
    pub fn reason(&self) -> String {
        match (&self.message, &self.result) {
            (Some(m), _) if !m.is_empty() => m.clone(),
            (_, Some(code)) => format!("vendor result code {code}"),
            _ => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityPage {
    #[serde(rename = "dataList", default)]
    pub data_list: Option<Vec<ActivityRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "labelId", deserialize_with = "deserialize_id")]
    pub label_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "sportType", default)]
    pub sport_type: Option<u32>,
    #[serde(default)]
    pub date: Option<u32>,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(rename = "totalTime", default)]
    pub total_time: Option<f64>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

impl From<ActivityRecord> for ActivitySummary {
    fn from(r: ActivityRecord) -> Self {
        ActivitySummary {
            id: r.label_id,
            name: r
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unnamed".to_string()),
            start_time: utils::timestamp_to_utc(r.start_time.unwrap_or_default()),
            date: r.date.and_then(utils::parse_vendor_date),
            distance: r.distance.unwrap_or_default(),
            duration: r.total_time.unwrap_or_default(),
            sport_type: SportType(r.sport_type.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadData {
    #[serde(rename = "fileUrl", default)]
    pub file_url: Option<String>,
}
