//! Minimal `CorosClient` trait and the types shared by its reqwest implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use secrecy::SecretString;
use std::fmt;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod region;
pub mod sport;
pub mod storage;
pub mod utils;
mod wire;

pub use region::Region;
pub use sport::SportType;

/// The client operation an error was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListActivities,
    DownloadActivity,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Login => "login",
            Operation::ListActivities => "list activities",
            Operation::DownloadActivity => "download activity",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum CorosError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{operation} failed: authentication rejected: {message}")]
    Auth {
        operation: Operation,
        message: String,
    },
    #[error("{operation} failed: not found: {message}")]
    NotFound {
        operation: Operation,
        message: String,
    },
    #[error("{operation} failed: {message}")]
    Api {
        operation: Operation,
        message: String,
    },
    #[error("io error")]
    Io(#[from] std::io::Error),
}

impl CorosError {
    pub fn auth(operation: Operation, message: impl Into<String>) -> Self {
        CorosError::Auth {
            operation,
            message: message.into(),
        }
    }

    pub fn not_found(operation: Operation, message: impl Into<String>) -> Self {
        CorosError::NotFound {
            operation,
            message: message.into(),
        }
    }

    pub fn api(operation: Operation, message: impl Into<String>) -> Self {
        CorosError::Api {
            operation,
            message: message.into(),
        }
    }

    /// Classify a transport-level reqwest failure. Timeouts are reported as
    /// API errors like any other vendor-side failure.
    pub(crate) fn transport(operation: Operation, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_decode() {
            format!("malformed response body: {err}")
        } else {
            err.to_string()
        };
        CorosError::api(operation, message)
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, CorosError::Auth { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CorosError::NotFound { .. })
    }
}

/// Login credentials. Only held in memory while a session is negotiated.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

/// An authenticated session. The token is never refreshed; a rejected token
/// requires a fresh [`CorosClient::authenticate`] call.
#[derive(Clone, Debug)]
pub struct Session {
    access_token: SecretString,
}

impl Session {
    pub fn new(access_token: SecretString) -> Self {
        Self { access_token }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivitySummary {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    /// Calendar day as the vendor recorded it, when present.
    pub date: Option<NaiveDate>,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub sport_type: SportType,
}

/// Export formats offered by the vendor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Gpx,
    Fit,
    Tcx,
    Kml,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Gpx,
        ExportFormat::Fit,
        ExportFormat::Tcx,
        ExportFormat::Kml,
        ExportFormat::Csv,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Gpx => "gpx",
            ExportFormat::Fit => "fit",
            ExportFormat::Tcx => "tcx",
            ExportFormat::Kml => "kml",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = CorosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.extension() == lowered)
            .ok_or_else(|| {
                CorosError::Config(format!(
                    "invalid format '{s}', choose from: gpx, fit, tcx, kml, csv"
                ))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    pub activity_id: String,
    /// Required by the vendor export endpoint alongside the id.
    pub sport_type: SportType,
    pub format: ExportFormat,
}

impl DownloadRequest {
    pub fn new(activity_id: impl Into<String>, sport_type: SportType, format: ExportFormat) -> Self {
        Self {
            activity_id: activity_id.into(),
            sport_type,
            format,
        }
    }

    pub fn for_activity(activity: &ActivitySummary, format: ExportFormat) -> Self {
        Self::new(activity.id.clone(), activity.sport_type, format)
    }

    /// `{activity_id}.{extension}`, unique per activity and format.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.activity_id, self.format.extension())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[async_trait]
pub trait CorosClient: Send + Sync + 'static {
    /// Log in and obtain an access token.
    ///
    /// The vendor allows one web session per account: a successful login
    /// signs out every other web session of the same account.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, CorosError>;

    /// Fetch the `limit` most recent activities, newest first as the vendor
    /// returns them.
    async fn list_activities(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<ActivitySummary>, CorosError>;

    /// Export one activity and return the file body untouched.
    async fn download_activity(
        &self,
        session: &Session,
        request: &DownloadRequest,
    ) -> Result<DownloadedFile, CorosError>;
}
